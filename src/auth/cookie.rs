//! Stores the backend session in private (encrypted) cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{
    Error,
    auth::Session,
    backend::{LoggedInUser, Profile, Token},
};

pub(crate) const COOKIE_TOKEN: &str = "token";
pub(crate) const COOKIE_USER_NAME: &str = "user_name";
pub(crate) const COOKIE_PROFILE: &str = "profile";

/// How long changed details are kept. Matches the longest session.
pub(crate) const PROFILE_COOKIE_DURATION: Duration = Duration::days(7);

/// The default duration for which session cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(12);

/// The name shown when the backend did not send the user's name.
pub(crate) const FALLBACK_USER_NAME: &str = "User";

fn session_cookie(name: &'static str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name, value))
        .expires(expiry)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Add the session cookies for `user` to the jar, valid for `duration` from now.
pub(crate) fn set_session_cookies(
    jar: PrivateCookieJar,
    user: &LoggedInUser,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    let jar = jar.add(session_cookie(
        COOKIE_TOKEN,
        user.token.as_str().to_owned(),
        expiry,
    ));

    add_profile_cookies(jar, &user.profile, expiry)
}

/// Replace the name and details cookies after the user changed their details.
pub(crate) fn set_profile_cookies(jar: PrivateCookieJar, profile: &Profile) -> PrivateCookieJar {
    add_profile_cookies(jar, profile, OffsetDateTime::now_utc() + PROFILE_COOKIE_DURATION)
}

fn add_profile_cookies(
    jar: PrivateCookieJar,
    profile: &Profile,
    expiry: OffsetDateTime,
) -> PrivateCookieJar {
    let user_name = Some(profile.first_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_owned());

    let jar = jar.add(session_cookie(COOKIE_USER_NAME, user_name, expiry));

    match serde_json::to_string(profile) {
        Ok(profile) => jar.add(session_cookie(COOKIE_PROFILE, profile, expiry)),
        Err(error) => {
            tracing::error!("Could not store the user's details in a cookie: {error}");
            jar
        }
    }
}

/// Set the session cookies to an invalid value and set their max age to
/// zero, which should delete the cookies on the client side.
pub(crate) fn invalidate_session_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    let expired = |name: &'static str| {
        Cookie::build((name, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
    };

    jar.add(expired(COOKIE_TOKEN))
        .add(expired(COOKIE_USER_NAME))
        .add(expired(COOKIE_PROFILE))
}

/// Read the session from the jar.
///
/// # Errors
/// Returns [Error::CookieMissing] if there is no usable token cookie.
pub(crate) fn get_session(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let token = jar
        .get(COOKIE_TOKEN)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty() && token != "deleted")
        .ok_or(Error::CookieMissing)?;

    let user_name = jar
        .get(COOKIE_USER_NAME)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_USER_NAME.to_owned());

    // Sessions started before details were stored have no profile cookie.
    let profile = jar
        .get(COOKIE_PROFILE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default();

    Ok(Session {
        token: Token::new(token),
        user_name,
        profile,
    })
}
