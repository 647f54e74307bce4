use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use time::macros::date;

use crate::{
    Error,
    backend::{
        Category, Credentials, FinanceBackend, LoggedInUser, NewExpense, NewIncome, NewUser,
        Profile, ProfileUpdate, Token,
    },
};

/// The token [FakeBackend] hands out and accepts.
pub(crate) const FAKE_TOKEN: &str = "fake-token";
/// The only password [FakeBackend] accepts.
pub(crate) const FAKE_PASSWORD: &str = "correct horse";
/// The message [FakeBackend] gives for a wrong password.
pub(crate) const WRONG_PASSWORD_MESSAGE: &str = "Wrong email or password";
/// An email [FakeBackend] treats as already registered.
pub(crate) const TAKEN_EMAIL: &str = "taken@example.com";
/// The message [FakeBackend] gives when registering [TAKEN_EMAIL].
pub(crate) const TAKEN_EMAIL_MESSAGE: &str = "El correo ya está registrado";

/// The details [FakeBackend] returns at log in.
pub(crate) fn fake_profile() -> Profile {
    Profile {
        first_name: "Ana".to_owned(),
        last_name: "García".to_owned(),
        email: "ana@example.com".to_owned(),
        phone: "5512345678".to_owned(),
        country: "México".to_owned(),
        birth_date: Some(date!(1990 - 04 - 02)),
    }
}

/// An in-memory backend for handler tests.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    expenses: Vec<Value>,
    income: Vec<Value>,
    categories: Vec<Category>,
    failure: Option<Error>,
    created_expenses: Mutex<Vec<NewExpense>>,
    created_income: Mutex<Vec<NewIncome>>,
    registered_users: Mutex<Vec<NewUser>>,
    profile_updates: Mutex<Vec<ProfileUpdate>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_expenses(mut self, expenses: Vec<Value>) -> Self {
        self.expenses = expenses;
        self
    }

    pub(crate) fn with_income(mut self, income: Vec<Value>) -> Self {
        self.income = income;
        self
    }

    pub(crate) fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Make every call fail with `error`.
    pub(crate) fn failing_with(mut self, error: Error) -> Self {
        self.failure = Some(error);
        self
    }

    pub(crate) fn created_expenses(&self) -> Vec<NewExpense> {
        self.created_expenses.lock().unwrap().clone()
    }

    pub(crate) fn created_income(&self) -> Vec<NewIncome> {
        self.created_income.lock().unwrap().clone()
    }

    pub(crate) fn registered_users(&self) -> Vec<NewUser> {
        self.registered_users.lock().unwrap().clone()
    }

    pub(crate) fn profile_updates(&self) -> Vec<ProfileUpdate> {
        self.profile_updates.lock().unwrap().clone()
    }

    fn check(&self, token: Option<&Token>) -> Result<(), Error> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        match token {
            Some(token) if token.as_str() != FAKE_TOKEN => Err(Error::Unauthorized),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl FinanceBackend for FakeBackend {
    async fn log_in(&self, credentials: &Credentials) -> Result<LoggedInUser, Error> {
        self.check(None)?;

        if credentials.password != FAKE_PASSWORD {
            return Err(Error::InvalidCredentials(WRONG_PASSWORD_MESSAGE.to_owned()));
        }

        Ok(LoggedInUser {
            token: Token::new(FAKE_TOKEN),
            profile: fake_profile(),
        })
    }

    async fn register(&self, user: &NewUser) -> Result<(), Error> {
        self.check(None)?;

        if user.profile.email == TAKEN_EMAIL {
            return Err(Error::BackendRejected(TAKEN_EMAIL_MESSAGE.to_owned()));
        }

        self.registered_users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn update_user(&self, token: &Token, update: &ProfileUpdate) -> Result<Profile, Error> {
        self.check(Some(token))?;
        self.profile_updates.lock().unwrap().push(update.clone());
        Ok(update.profile.clone())
    }

    async fn list_expenses(&self, token: &Token) -> Result<Vec<Value>, Error> {
        self.check(Some(token))?;
        Ok(self.expenses.clone())
    }

    async fn list_income(&self, token: &Token) -> Result<Vec<Value>, Error> {
        self.check(Some(token))?;
        Ok(self.income.clone())
    }

    async fn create_expense(&self, token: &Token, expense: &NewExpense) -> Result<(), Error> {
        self.check(Some(token))?;
        self.created_expenses.lock().unwrap().push(expense.clone());
        Ok(())
    }

    async fn create_income(&self, token: &Token, income: &NewIncome) -> Result<(), Error> {
        self.check(Some(token))?;
        self.created_income.lock().unwrap().push(income.clone());
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.check(None)?;
        Ok(self.categories.clone())
    }
}
