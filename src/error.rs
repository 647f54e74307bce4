//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    alert::Alert, endpoints, internal_server_error::InternalServerError, not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The backend refused the email and password.
    ///
    /// Holds the message the backend gave, or a generic message if it did not
    /// give one.
    #[error("log in failed: {0}")]
    InvalidCredentials(String),

    /// The backend rejected the session token, e.g. because it expired.
    #[error("the backend rejected the session token")]
    Unauthorized,

    /// The backend could not be reached, or it did not answer in time.
    #[error("could not reach the backend: {0}")]
    BackendUnavailable(String),

    /// The backend answered with an unexpected status code.
    #[error("the backend responded with status {0}")]
    BackendStatus(u16),

    /// The backend's response body was not in the expected shape.
    #[error("could not read the backend response: {0}")]
    BackendResponse(String),

    /// The backend answered a create request with an error message.
    #[error("the backend rejected the request: {0}")]
    BackendRejected(String),

    /// The configured backend URL is not a valid base URL.
    #[error("invalid backend URL \"{0}\"")]
    InvalidBackendUrl(String),

    /// An amount typed into a form is not a positive number of cents.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// A required text field of a form was blank.
    #[error("the field \"{0}\" cannot be empty")]
    EmptyField(&'static str),

    /// The session cookies are missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            Error::BackendStatus(status.as_u16())
        } else if error.is_decode() {
            Error::BackendResponse(error.to_string())
        } else {
            Error::BackendUnavailable(error.to_string())
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            // The session is stale, so clear it and start over at the log-in page.
            Error::Unauthorized => Redirect::to(endpoints::LOG_OUT).into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::BackendUnavailable(reason) => {
                tracing::error!("Could not reach the backend: {reason}");
                InternalServerError {
                    description: "Could not reach the finance server",
                    fix: "Check that the backend is running and try again.",
                }
                .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    ///
    /// [Error::Unauthorized] is the exception: it becomes a HTMX redirect to
    /// the log-out route since an alert cannot fix an expired session.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Unauthorized => {
                return (
                    HxRedirect(endpoints::LOG_OUT.to_owned()),
                    StatusCode::OK,
                )
                    .into_response();
            }
            Error::InvalidCredentials(message) => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Could not log in".to_owned(),
                    details: message,
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "\"{amount}\" is not a valid amount. \
                        Enter a number greater than zero with at most two decimal places."
                    ),
                },
            ),
            Error::EmptyField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: format!("Missing {field}"),
                    details: format!("Enter a {field} and try again."),
                },
            ),
            Error::BackendRejected(message) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "The finance server rejected the request".to_owned(),
                    details: message,
                },
            ),
            Error::BackendUnavailable(reason) => {
                tracing::error!("Could not reach the backend: {reason}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "Could not reach the finance server".to_owned(),
                        details: "Check that the backend is running and try again.".to_owned(),
                    },
                )
            }
            Error::BackendStatus(status) => {
                tracing::error!("The backend responded with status {status}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: "The finance server returned an error".to_owned(),
                        details: format!("The server responded with status {status}."),
                    },
                )
            }
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
