//! The canonical shape of income and expense records.

use std::fmt::Display;

use rust_decimal::Decimal;
use time::Date;

/// The backend's identifier for an expense category.
pub type CategoryId = i64;

/// Whether a record is money going out or coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Money spent.
    Expense,
    /// Money received.
    Income,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Expense => write!(f, "expense"),
            RecordKind::Income => write!(f, "income"),
        }
    }
}

/// A dated, amount-bearing entry that can be filtered by period and summed.
pub trait FinancialRecord {
    /// The amount of money, in the user's currency.
    fn amount(&self) -> Decimal;

    /// The calendar date the money moved.
    fn date(&self) -> Date;

    /// The free-text label shown next to the record.
    fn label(&self) -> &str;
}

/// Money the user spent.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    /// The amount spent.
    pub amount: Decimal,
    /// The date the expense occurred.
    pub date: Date,
    /// What the money was spent on.
    pub description: String,
    /// The category the backend filed the expense under, if any.
    pub category: Option<CategoryId>,
}

/// Money the user received.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRecord {
    /// The amount received.
    pub amount: Decimal,
    /// The date the income was received.
    pub date: Date,
    /// Where the money came from, e.g. "Salary".
    pub origin: String,
}

impl FinancialRecord for ExpenseRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn date(&self) -> Date {
        self.date
    }

    fn label(&self) -> &str {
        &self.description
    }
}

impl FinancialRecord for IncomeRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }

    fn date(&self) -> Date {
        self.date
    }

    fn label(&self) -> &str {
        &self.origin
    }
}
