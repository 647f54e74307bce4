//! Loads the user's records from the backend and renders the analysis section.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::Markup;
use time::UtcOffset;

use crate::{
    AppState, Error,
    analysis::{
        aggregation::summarize,
        view::{AnalysisContext, analysis_view},
        view_state::AnalysisView,
    },
    auth::Session,
    backend::{FinanceBackend, Token},
    record::{ExpenseRecord, IncomeRecord, NormalizationMode, normalize_expenses, normalize_income},
    settings::get_theme,
    theme::Theme,
    timezone::local_now,
};

/// The state needed to load and summarize records.
#[derive(Debug, Clone)]
pub struct RecordsState {
    pub backend: Arc<dyn FinanceBackend>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub normalization: NormalizationMode,
}

impl FromRef<AppState> for RecordsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
            local_timezone: state.local_timezone.clone(),
            normalization: state.normalization,
        }
    }
}

/// One fetch of the user's records, already normalized.
#[derive(Debug)]
pub(crate) struct RecordSnapshot {
    pub expenses: Vec<ExpenseRecord>,
    pub income: Vec<IncomeRecord>,
    /// Records rejected in strict mode. Always zero in lenient mode.
    pub skipped: usize,
}

/// Fetch both record lists concurrently and normalize them.
pub(crate) async fn load_records(
    backend: &dyn FinanceBackend,
    token: &Token,
    mode: NormalizationMode,
    local_offset: UtcOffset,
) -> Result<RecordSnapshot, Error> {
    let (raw_expenses, raw_income) =
        tokio::try_join!(backend.list_expenses(token), backend.list_income(token))?;

    let expenses = normalize_expenses(&raw_expenses, mode, local_offset);
    let income = normalize_income(&raw_income, mode, local_offset);

    if !expenses.rejected.is_empty() || !income.rejected.is_empty() {
        tracing::debug!(
            "{} expense and {} income records could not be normalized",
            expenses.rejected.len(),
            income.rejected.len()
        );
    }

    let skipped = match mode {
        NormalizationMode::Strict => expenses.rejected.len() + income.rejected.len(),
        NormalizationMode::Lenient => 0,
    };

    Ok(RecordSnapshot {
        expenses: expenses.records,
        income: income.records,
        skipped,
    })
}

/// Render the analysis section for `view` from a fresh copy of the user's records.
pub(crate) async fn render_analysis(
    state: &RecordsState,
    session: &Session,
    view: AnalysisView,
    theme: Theme,
) -> Result<Markup, Error> {
    let now = local_now(&state.local_timezone)?;
    let (local_offset, today) = (now.offset(), now.date());

    let records = load_records(
        state.backend.as_ref(),
        &session.token,
        state.normalization,
        local_offset,
    )
    .await?;

    let summary = summarize(&records.expenses, &records.income, view.period, today);
    tracing::debug!(
        "{} income and {} expense records in {:?} period",
        summary.filtered_income.len(),
        summary.filtered_expenses.len(),
        view.period
    );

    let context = AnalysisContext {
        view,
        theme,
        skipped_records: records.skipped,
    };

    Ok(analysis_view(&summary, &context))
}

/// The analysis section alone, for HTMX requests that change the period or
/// the details toggle.
pub async fn get_analysis_fragment(
    State(state): State<RecordsState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
    Query(view): Query<AnalysisView>,
) -> Response {
    match render_analysis(&state, &session, view, get_theme(&jar)).await {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}
