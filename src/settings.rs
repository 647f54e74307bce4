//! The settings page: the dark mode preference and the user's details.
//!
//! The preference lives in a plain cookie since it is not sensitive and the
//! backend has nowhere to store it. The details form is saved by
//! [crate::user::put_profile].

use axum::{
    Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{
    CookieJar, Form,
    cookie::{Cookie, SameSite},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::Duration;

use crate::{
    auth::Session,
    backend::Profile,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, PAGE_CONTAINER_STYLE, themed_base,
    },
    navigation::NavBar,
    theme::Theme,
    user::{UserForm, profile_form},
};

/// The cookie holding "true" when the user prefers the dark theme.
pub const COOKIE_DARK_MODE: &str = "dark_mode";
/// How long the theme preference is remembered.
pub const DARK_MODE_COOKIE_DURATION: Duration = Duration::days(365);

/// The theme stored in `jar`, defaulting to [Theme::Light].
pub fn get_theme(jar: &CookieJar) -> Theme {
    jar.get(COOKIE_DARK_MODE)
        .map(|cookie| Theme::from(cookie.value() == "true"))
        .unwrap_or_default()
}

fn dark_mode_cookie(theme: Theme) -> Cookie<'static> {
    Cookie::build((COOKIE_DARK_MODE, theme.is_dark().to_string()))
        .path("/")
        .max_age(DARK_MODE_COOKIE_DURATION)
        .same_site(SameSite::Lax)
        .build()
}

fn theme_option(value: &str, label: &str, checked: bool) -> Markup {
    let id = format!("theme-{value}");

    html! {
        div class="flex items-center gap-3"
        {
            input
                type="radio"
                name="dark_mode"
                id=(id)
                value=(value)
                class=(FORM_RADIO_INPUT_STYLE)
                checked[checked];

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

fn settings_view(user_name: &str, theme: Theme, profile: &Profile) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            section class={ "w-full max-w-md " (CARD_STYLE) }
            {
                h1 class="mb-2 text-xl font-bold" { "Settings" }
                p class="mb-4 text-sm text-gray-600 dark:text-gray-300"
                {
                    "Signed in as " (user_name)
                }

                form
                    hx-post=(endpoints::THEME_API)
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    fieldset class=(FORM_RADIO_GROUP_STYLE)
                    {
                        legend class="mb-2 text-sm font-medium" { "Theme" }
                        (theme_option("false", "Light", !theme.is_dark()))
                        (theme_option("true", "Dark", theme.is_dark()))
                    }

                    button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Save"
                    }
                }
            }

            section class={ "w-full max-w-md mt-6 " (CARD_STYLE) }
            {
                (profile_form(&UserForm::from(profile), &[], false))
            }
        }
    };

    themed_base("Settings", theme, &[], &content)
}

/// Display the settings page with the current theme selected and the
/// user's details filled in.
pub async fn get_settings_page(
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Response {
    settings_view(&session.user_name, get_theme(&jar), &session.profile).into_response()
}

/// The form sent by the settings page.
#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    /// Missing when no radio button is checked, which means light.
    pub dark_mode: Option<bool>,
}

/// Store the theme preference and reload the settings page.
pub async fn post_theme(jar: CookieJar, Form(form): Form<ThemeForm>) -> Response {
    let theme = Theme::from(form.dark_mode.unwrap_or(false));
    tracing::debug!("Switching to {theme:?} theme");

    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
        jar.add(dark_mode_cookie(theme)),
    )
        .into_response()
}
