//! The weekly and monthly windows used to filter records for display.

use serde::Deserialize;
use time::{Date, Duration};

use crate::record::FinancialRecord;

/// How many days before today the weekly window reaches back, inclusive.
const WEEKLY_LOOKBACK_DAYS: i64 = 7;

/// The window of time the analysis covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Today and the seven days before it.
    Weekly,
    /// The current calendar month, not a rolling 30 days.
    #[default]
    Monthly,
}

impl Period {
    /// Every period, in the order the selector shows them.
    pub const ALL: [Period; 2] = [Period::Weekly, Period::Monthly];

    /// Whether `date` falls inside this period as seen from `today`.
    pub fn contains(self, date: Date, today: Date) -> bool {
        match self {
            Period::Weekly => {
                let start = today
                    .checked_sub(Duration::days(WEEKLY_LOOKBACK_DAYS))
                    .unwrap_or(Date::MIN);

                start <= date && date <= today
            }
            Period::Monthly => date.year() == today.year() && date.month() == today.month(),
        }
    }

    pub fn as_query_value(self) -> &'static str {
        match self {
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::Weekly => "Weekly",
            Period::Monthly => "Monthly",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Period::Weekly => "Last seven days",
            Period::Monthly => "This month",
        }
    }
}

/// Keep the records that fall inside `period` as seen from `today`.
///
/// The relative order of `records` is preserved.
pub fn filter_by_period<R: FinancialRecord>(
    records: &[R],
    period: Period,
    today: Date,
) -> Vec<&R> {
    records
        .iter()
        .filter(|record| period.contains(record.date(), today))
        .collect()
}
