//! The details section of the settings page and the endpoint that saves it.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    auth::{Session, set_profile_cookies},
    backend::{FinanceBackend, ProfileUpdate},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    timezone::local_now,
};

use super::form::{
    PasswordRule, UserForm, details_fields, problem_list, problem_messages, validate_details,
};

pub const PROFILE_SAVED_MSG: &str = "Your details were saved.";

/// The state needed to change the user's details.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub cookie_key: Key,
    pub backend: Arc<dyn FinanceBackend>,
    pub local_timezone: String,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            backend: state.backend.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<ProfileState> for Key {
    fn from_ref(state: &ProfileState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form for editing the user's details, as shown on the settings page.
pub fn profile_form(values: &UserForm, problems: &[String], saved: bool) -> Markup {
    html! {
        form
            id="profile-form"
            hx-put=(endpoints::PROFILE_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "Your details" }

            (problem_list(problems))

            @if saved {
                p role="status" class="text-sm text-green-600 dark:text-green-400"
                {
                    (PROFILE_SAVED_MSG)
                }
            }

            (details_fields(values))

            div
            {
                label for="new_password" class=(FORM_LABEL_STYLE)
                {
                    "New password (leave blank to keep the current one)"
                }

                input
                    type="password"
                    name="password"
                    id="new_password"
                    autocomplete="new-password"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="profile-submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                "Save details"
            }
        }
    }
}

/// Send the changed details to the backend.
///
/// The stored profile cookie is refreshed with what the backend kept so the
/// navigation and the settings page show the new name straight away.
pub async fn put_profile(
    State(state): State<ProfileState>,
    Extension(session): Extension<Session>,
    jar: PrivateCookieJar,
    Form(form): Form<UserForm>,
) -> Response {
    let today = match local_now(&state.local_timezone) {
        Ok(now) => now.date(),
        Err(error) => return error.into_alert_response(),
    };

    let details = match validate_details(&form, today, PasswordRule::Optional) {
        Ok(details) => details,
        Err(problems) => {
            return profile_form(&form, &problem_messages(&problems), false).into_response();
        }
    };

    let update = ProfileUpdate {
        profile: details.profile,
        new_password: details.password,
    };

    match state.backend.update_user(&session.token, &update).await {
        Ok(stored) => {
            tracing::info!(
                "Updated details for {}{}",
                stored.email,
                if update.new_password.is_some() { " including password" } else { "" }
            );
            (
                set_profile_cookies(jar, &stored),
                profile_form(&UserForm::from(&stored), &[], true),
            )
                .into_response()
        }
        Err(Error::BackendRejected(message)) => {
            profile_form(&form, &[message], false).into_response()
        }
        Err(error) => {
            tracing::error!("Could not update details: {error}");
            error.into_alert_response()
        }
    }
}
