//! Defines the endpoints for adding an expense or income entry.
use std::{str::FromStr, sync::Arc};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Session,
    backend::{FinanceBackend, NewExpense, NewIncome},
    endpoints,
    record::CategoryId,
};

/// The state needed to create records.
#[derive(Debug, Clone)]
pub struct CreateRecordState {
    pub backend: Arc<dyn FinanceBackend>,
}

impl FromRef<AppState> for CreateRecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// The form data for adding an expense.
#[derive(Debug, Deserialize)]
pub struct ExpenseForm {
    pub description: Option<String>,
    /// The amount in dollars as typed, e.g. "12.50".
    pub amount: Option<String>,
    pub category: Option<CategoryId>,
}

/// The form data for adding income.
#[derive(Debug, Deserialize)]
pub struct IncomeForm {
    pub amount: Option<String>,
    pub origin: Option<String>,
}

/// Parse a dollar amount typed into a form.
///
/// The amount must be greater than zero and have at most two decimal places.
fn parse_form_amount(raw: Option<&str>) -> Result<Decimal, Error> {
    let text = raw.map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(Error::EmptyField("amount"));
    }

    let amount = Decimal::from_str(text)
        .map_err(|_| Error::InvalidAmount(text.to_owned()))?
        .normalize();

    if amount <= Decimal::ZERO || amount.scale() > 2 {
        return Err(Error::InvalidAmount(text.to_owned()));
    }

    Ok(amount)
}

fn required_text(raw: Option<String>, field: &'static str) -> Result<String, Error> {
    raw.map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or(Error::EmptyField(field))
}

impl TryFrom<ExpenseForm> for NewExpense {
    type Error = Error;

    fn try_from(form: ExpenseForm) -> Result<Self, Self::Error> {
        Ok(NewExpense {
            amount: parse_form_amount(form.amount.as_deref())?,
            description: required_text(form.description, "description")?,
            category: form.category.ok_or(Error::EmptyField("category"))?,
        })
    }
}

impl TryFrom<IncomeForm> for NewIncome {
    type Error = Error;

    fn try_from(form: IncomeForm) -> Result<Self, Self::Error> {
        Ok(NewIncome {
            amount: parse_form_amount(form.amount.as_deref())?,
            origin: required_text(form.origin, "origin")?,
        })
    }
}

fn back_to_dashboard() -> Response {
    (
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// A route handler for adding an expense, redirects to the dashboard on success.
pub async fn create_expense_endpoint(
    State(state): State<CreateRecordState>,
    Extension(session): Extension<Session>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense = match NewExpense::try_from(form) {
        Ok(expense) => expense,
        Err(error) => {
            tracing::debug!("Rejected expense form: {error}");
            return error.into_alert_response();
        }
    };

    match state.backend.create_expense(&session.token, &expense).await {
        Ok(()) => back_to_dashboard(),
        Err(error) => {
            tracing::error!("Could not create expense: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for adding income, redirects to the dashboard on success.
pub async fn create_income_endpoint(
    State(state): State<CreateRecordState>,
    Extension(session): Extension<Session>,
    Form(form): Form<IncomeForm>,
) -> Response {
    let income = match NewIncome::try_from(form) {
        Ok(income) => income,
        Err(error) => {
            tracing::debug!("Rejected income form: {error}");
            return error.into_alert_response();
        }
    };

    match state.backend.create_income(&session.token, &income).await {
        Ok(()) => back_to_dashboard(),
        Err(error) => {
            tracing::error!("Could not create income: {error}");
            error.into_alert_response()
        }
    }
}
