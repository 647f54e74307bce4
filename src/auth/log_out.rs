//! Log-out route handler that invalidates the session cookies and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_session_cookies, endpoints};

/// Invalidate the session cookies and redirect the client to the log-in page.
///
/// The backend keeps no session state, so forgetting the token is enough.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookies(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
