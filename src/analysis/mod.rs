//! The income and expense analysis shown on the dashboard.
//!
//! Records are filtered to the selected [Period], summed into a [Summary]
//! and rendered as a chart with totals and optional itemized lists. The
//! period and the details toggle are held in an [AnalysisView] taken from
//! the query string.

mod aggregation;
mod chart;
mod handlers;
mod period;
mod view;
mod view_state;

pub use handlers::{RecordsState, get_analysis_fragment};
pub use view_state::AnalysisView;

pub(crate) use handlers::render_analysis;

#[cfg(test)]
pub(crate) use period::Period;
#[cfg(test)]
pub(crate) use view::ANALYSIS_SECTION_ID;
