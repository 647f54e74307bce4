//! Dashboard module
//!
//! The page where users add expenses and income and see the analysis for
//! the selected period.

mod create_endpoint;
mod forms;
mod handlers;

pub use create_endpoint::{CreateRecordState, create_expense_endpoint, create_income_endpoint};
pub use handlers::get_dashboard_page;
