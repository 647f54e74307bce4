//! Request and response bodies exchanged with the finance backend.

use std::fmt::Debug;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::record::CategoryId;

/// The opaque bearer token the backend issues at log in.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in debug logs via the session extension, so never print them.
impl Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(********)")
    }
}

/// The email and password entered on the log-in page.
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "correoElectronico")]
    pub email: String,
    #[serde(rename = "contrasena")]
    pub password: String,
}

/// A successful log in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggedInUser {
    pub token: Token,
    /// Whatever personal details the backend sent along with the token.
    pub profile: Profile,
}

impl LoggedInUser {
    /// The user's first name, if the backend sent one.
    pub fn user_name(&self) -> Option<&str> {
        Some(self.profile.first_name.as_str()).filter(|name| !name.is_empty())
    }
}

const BIRTH_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The personal details the backend keeps for a user.
///
/// Fields the backend did not send are left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Ten digits, e.g. "5512345678".
    pub phone: String,
    pub country: String,
    pub birth_date: Option<Date>,
}

impl Profile {
    /// Read a `usuario` object from the backend.
    ///
    /// The phone number may be a JSON number and the birth date may be a
    /// plain date or a date-time, of which only the date is kept.
    pub(super) fn from_backend(usuario: &Value) -> Self {
        let text = |key: &str| match usuario.get(key) {
            Some(Value::String(text)) => text.trim().to_owned(),
            Some(Value::Number(number)) => number.to_string(),
            _ => String::new(),
        };

        let birth_date = usuario
            .get("fechaNacimiento")
            .and_then(Value::as_str)
            .and_then(|text| text.get(..10))
            .and_then(|date| Date::parse(date, BIRTH_DATE_FORMAT).ok());

        Self {
            first_name: text("nombreUsuario"),
            last_name: text("apellidoUsuario"),
            email: text("correoElectronico"),
            phone: text("numeroCelular"),
            country: text("pais"),
            birth_date,
        }
    }
}

/// A validated registration ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub profile: Profile,
    pub password: String,
}

/// Validated changes to the logged in user's details.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub profile: Profile,
    /// Only sent when the user asked to change their password.
    pub new_password: Option<String>,
}

/// The wire shape of [NewUser] and [ProfileUpdate].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UserBody<'a> {
    pub nombre_usuario: &'a str,
    pub apellido_usuario: &'a str,
    pub correo_electronico: &'a str,
    pub numero_celular: &'a str,
    pub pais: &'a str,
    pub fecha_nacimiento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<&'a str>,
}

impl<'a> UserBody<'a> {
    fn new(profile: &'a Profile, password: Option<&'a str>) -> Self {
        Self {
            nombre_usuario: &profile.first_name,
            apellido_usuario: &profile.last_name,
            correo_electronico: &profile.email,
            numero_celular: &profile.phone,
            pais: &profile.country,
            fecha_nacimiento: profile.birth_date.map(|date| date.to_string()),
            contrasena: password,
        }
    }
}

impl<'a> From<&'a NewUser> for UserBody<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self::new(&user.profile, Some(&user.password))
    }
}

impl<'a> From<&'a ProfileUpdate> for UserBody<'a> {
    fn from(update: &'a ProfileUpdate) -> Self {
        Self::new(&update.profile, update.new_password.as_deref())
    }
}

/// The raw response to a profile update, e.g. `{"usuario": {...}}`.
#[derive(Deserialize)]
pub(super) struct UpdateUserResponse {
    pub usuario: Option<Value>,
}

/// The raw log-in response, e.g. `{"usuario": {...}, "token": "..."}`.
#[derive(Deserialize)]
pub(super) struct LogInResponse {
    pub usuario: Option<Value>,
    pub token: Option<String>,
}

impl LogInResponse {
    /// Both the user and the token must be present for the log in to count.
    pub(super) fn into_logged_in_user(self) -> Option<LoggedInUser> {
        let usuario = self.usuario.filter(|usuario| !usuario.is_null())?;
        let token = self.token.filter(|token| !token.trim().is_empty())?;

        Some(LoggedInUser {
            token: Token::new(token),
            profile: Profile::from_backend(&usuario),
        })
    }
}

/// An expense category offered by the expense form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A validated expense ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: CategoryId,
}

/// A validated income entry ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub amount: Decimal,
    pub origin: String,
}

/// The wire shape of [NewExpense]. The description doubles as the name.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExpenseBody<'a> {
    pub nombre_gasto: &'a str,
    pub cantidad_gasto: String,
    pub descripcion_gasto: &'a str,
    pub id_categoria: CategoryId,
}

impl<'a> From<&'a NewExpense> for ExpenseBody<'a> {
    fn from(expense: &'a NewExpense) -> Self {
        Self {
            nombre_gasto: &expense.description,
            cantidad_gasto: expense.amount.to_string(),
            descripcion_gasto: &expense.description,
            id_categoria: expense.category,
        }
    }
}

/// The wire shape of [NewIncome].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct IncomeBody<'a> {
    pub cantidad_ingreso: String,
    pub origen_ingreso: &'a str,
}

impl<'a> From<&'a NewIncome> for IncomeBody<'a> {
    fn from(income: &'a NewIncome) -> Self {
        Self {
            cantidad_ingreso: income.amount.to_string(),
            origen_ingreso: &income.origin,
        }
    }
}
