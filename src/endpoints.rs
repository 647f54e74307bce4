//! The URIs of the pages and API routes.
//!
//! Routes under `/api` answer HTMX requests with fragments or redirects,
//! everything else renders a full page.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for logged in users with the record forms and the analysis.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page for creating an account.
pub const REGISTER_VIEW: &str = "/register";
/// The page for display preferences.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for creating an account.
pub const REGISTER_API: &str = "/api/register";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for the analysis section alone, swapped in when the period or details change.
pub const ANALYSIS_API: &str = "/api/analysis";
/// The route to create an expense.
pub const EXPENSES_API: &str = "/api/expenses";
/// The route to create an income entry.
pub const INCOME_API: &str = "/api/income";
/// The route to save the theme preference.
pub const THEME_API: &str = "/api/settings/theme";
/// The route to change the user's details and password.
pub const PROFILE_API: &str = "/api/settings/profile";
