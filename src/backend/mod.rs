//! Access to the remote finance backend that owns users, records and categories.
//!
//! The web app never stores financial data itself. Every page load fetches
//! the records it needs through [FinanceBackend], which lets the handlers be
//! tested against an in-memory backend.

mod client;
mod models;

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::Error;

pub use client::{BackendClient, DEFAULT_BACKEND_URL};
pub use models::{
    Category, Credentials, LoggedInUser, NewExpense, NewIncome, NewUser, Profile, ProfileUpdate,
    Token,
};

/// The operations the web app needs from the finance backend.
///
/// Record lists are returned as raw JSON values so that the records can be
/// validated in one place, see [crate::record::normalize_expenses].
#[async_trait]
pub trait FinanceBackend: Send + Sync + Debug {
    /// Exchange an email and password for a session token.
    async fn log_in(&self, credentials: &Credentials) -> Result<LoggedInUser, Error>;

    /// Create an account. The new user logs in separately afterwards.
    async fn register(&self, user: &NewUser) -> Result<(), Error>;

    /// Replace the logged in user's details, returning them as the backend
    /// stored them.
    async fn update_user(&self, token: &Token, update: &ProfileUpdate) -> Result<Profile, Error>;

    /// All of the user's expense records, in the backend's own shape.
    async fn list_expenses(&self, token: &Token) -> Result<Vec<Value>, Error>;

    /// All of the user's income records, in the backend's own shape.
    async fn list_income(&self, token: &Token) -> Result<Vec<Value>, Error>;

    /// Add an expense for the user.
    async fn create_expense(&self, token: &Token, expense: &NewExpense) -> Result<(), Error>;

    /// Add an income entry for the user.
    async fn create_income(&self, token: &Token, income: &NewIncome) -> Result<(), Error>;

    /// The expense categories. These are shared by all users.
    async fn list_categories(&self) -> Result<Vec<Category>, Error>;
}
