//! Income and expense records and the boundary that turns backend JSON into them.

mod model;
mod normalize;

pub use model::{CategoryId, ExpenseRecord, FinancialRecord, IncomeRecord};
pub use normalize::{NormalizationMode, normalize_expenses, normalize_income};
