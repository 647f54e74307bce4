//! Log in, log out and the middleware that guards the pages behind them.
//!
//! The backend issues a bearer token at log in. The token, the user's name
//! and their details are kept in private cookies and handed to route
//! handlers as a [Session].

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;

use crate::backend::{Profile, Token};

pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};

pub(crate) use cookie::{DEFAULT_COOKIE_DURATION, set_profile_cookies};
#[cfg(test)]
pub(crate) use cookie::COOKIE_PROFILE;

/// The logged in user, as read from the session cookies.
#[derive(Debug, Clone)]
pub struct Session {
    /// The token to send with every backend request.
    pub token: Token,
    /// The name to greet the user with.
    pub user_name: String,
    /// The user's details as of log in or their last change.
    pub profile: Profile,
}
