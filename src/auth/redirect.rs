//! Remembers where the user was headed when they were sent to the log-in page.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only same-site paths are allowed, and never the log-in page itself.
fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map_or(redirect_url, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && !path.starts_with("/api")
}

/// The path and query of `raw_url` if it is a safe place to go after logging in.
///
/// Absolute URLs are accepted only when `allow_absolute` is set, since the
/// `HX-Current-URL` header always holds one.
fn to_redirect_target(raw_url: &str, allow_absolute: bool) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if !allow_absolute && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();
    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Validate a redirect URL received from a client.
pub(crate) fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    to_redirect_target(raw_url, false)
}

/// The log-in page URL that sends the user back to `redirect_target` afterwards.
pub(crate) fn log_in_url_with_redirect(redirect_target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_VIEW),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// The log-in page URL for a request that was refused for lack of a session.
///
/// Page requests return to the page itself. HTMX requests return to the page
/// that made them, which is found in the `HX-Current-URL` header.
pub(crate) fn build_log_in_redirect_url(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        request
            .headers()
            .get("hx-current-url")
            .and_then(|header| header.to_str().ok())
            .and_then(|current_url| to_redirect_target(current_url, true))
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    match target {
        Some(target) => log_in_url_with_redirect(&target),
        None => {
            tracing::debug!(
                "No redirect target for {}, falling back to the dashboard.",
                request.uri()
            );
            log_in_url_with_redirect(endpoints::DASHBOARD_VIEW)
        }
    }
}
