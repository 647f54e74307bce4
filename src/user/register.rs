//! The page for creating an account and the endpoint that sends new users to
//! the backend.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    backend::{FinanceBackend, NewUser},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, loading_spinner, log_in_card, password_input},
    timezone::local_now,
};

use super::form::{
    PasswordRule, UserForm, details_fields, problem_list, problem_messages, validate_details,
};

pub const REGISTRATION_FAILED_MSG: &str =
    "Could not create your account right now. Please try again later.";

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    pub backend: Arc<dyn FinanceBackend>,
    /// Used to work out the user's age.
    pub local_timezone: String,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn registration_form(values: &UserForm, problems: &[String]) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (problem_list(problems))
            (details_fields(values))
            (password_input(None))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a
                    href=(endpoints::LOG_IN_VIEW)
                    class="font-medium text-blue-600 hover:underline dark:text-blue-500"
                {
                    "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = registration_form(&UserForm::default(), &[]);
    let content = log_in_card("Create an account", &form);
    base("Register", &[], &content).into_response()
}

/// Handler for registration requests via the POST method.
///
/// A new account sends the user to the log-in page. Otherwise the form is
/// returned with the values they typed and a list of what went wrong.
pub async fn post_register(
    State(state): State<RegistrationState>,
    Form(form): Form<UserForm>,
) -> Response {
    let today = match local_now(&state.local_timezone) {
        Ok(now) => now.date(),
        Err(error) => return error.into_alert_response(),
    };

    let details = match validate_details(&form, today, PasswordRule::Required) {
        Ok(details) => details,
        Err(problems) => {
            return registration_form(&form, &problem_messages(&problems)).into_response();
        }
    };

    let new_user = NewUser {
        profile: details.profile,
        // Required passwords are never missing after validation.
        password: details.password.unwrap_or_default(),
    };

    match state.backend.register(&new_user).await {
        Ok(()) => {
            tracing::info!("Registered {}", new_user.profile.email);
            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::BackendRejected(message)) => {
            registration_form(&form, &[message]).into_response()
        }
        Err(error) => {
            tracing::error!("Unhandled error while registering: {error}");
            registration_form(&form, &[REGISTRATION_FAILED_MSG.to_owned()]).into_response()
        }
    }
}

#[cfg(test)]
mod register_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_content_type, assert_form_input, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::get_register_page;

    #[tokio::test]
    async fn register_page_displays_form() {
        let response = get_register_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "text/html; charset=utf-8");

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::REGISTER_API, "hx-post");
        assert_form_input(&form, "first_name", "text");
        assert_form_input(&form, "last_name", "text");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "phone", "tel");
        assert_form_input(&form, "country", "text");
        assert_form_input(&form, "birth_date", "date");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button_with_text(&form, "Create account");
    }
}
