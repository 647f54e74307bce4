//! The two independent toggles of the analysis section.
//!
//! Both live in the query string, so every link or button that changes one
//! of them carries the other along unchanged.

use serde::Deserialize;

use crate::analysis::period::Period;

/// Whether the itemized lists under the chart are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "bool")]
pub enum DetailsToggle {
    #[default]
    Collapsed,
    Expanded,
}

impl From<bool> for DetailsToggle {
    fn from(expanded: bool) -> Self {
        if expanded {
            DetailsToggle::Expanded
        } else {
            DetailsToggle::Collapsed
        }
    }
}

impl DetailsToggle {
    pub fn toggled(self) -> Self {
        match self {
            DetailsToggle::Collapsed => DetailsToggle::Expanded,
            DetailsToggle::Expanded => DetailsToggle::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == DetailsToggle::Expanded
    }
}

/// The request-local view state of the analysis section.
///
/// Missing query parameters fall back to the monthly period with the
/// details collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct AnalysisView {
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub details: DetailsToggle,
}

impl AnalysisView {
    /// The same view with `period` selected. The details toggle is untouched.
    pub fn with_period(self, period: Period) -> Self {
        Self { period, ..self }
    }

    /// The same view with the details toggle flipped. The period is untouched.
    pub fn with_details_toggled(self) -> Self {
        Self {
            details: self.details.toggled(),
            ..self
        }
    }

    /// Encode the view as a query string, e.g. `period=weekly&details=true`.
    pub fn to_query(self) -> String {
        format!(
            "period={}&details={}",
            self.period.as_query_value(),
            self.details.is_expanded()
        )
    }

    /// Append the encoded view to `path`.
    pub fn url(self, path: &str) -> String {
        format!("{path}?{}", self.to_query())
    }
}
