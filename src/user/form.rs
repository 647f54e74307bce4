//! The personal details form shared by the registration page and the settings
//! page, and the checks its values must pass before they reach the backend.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    backend::Profile,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The youngest age, in calendar years, a user may have.
pub const MIN_AGE_YEARS: i32 = 10;
/// The shortest password the backend accepts.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Phone numbers are national numbers without a country code.
pub const PHONE_DIGITS: usize = 10;

const DATE_INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The raw values of the details form.
///
/// Every field is optional so a half filled form can be sent back to the user
/// with the problems listed instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    /// As sent by a date input, e.g. "1990-04-02".
    pub birth_date: Option<String>,
    pub password: Option<String>,
}

impl From<&Profile> for UserForm {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: Some(profile.first_name.clone()),
            last_name: Some(profile.last_name.clone()),
            email: Some(profile.email.clone()),
            phone: Some(profile.phone.clone()),
            country: Some(profile.country.clone()),
            birth_date: profile.birth_date.map(|date| date.to_string()),
            password: None,
        }
    }
}

/// Whether the form must carry a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Required,
    /// A blank password keeps the current one.
    Optional,
}

/// A problem with one of the values in [UserForm].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDetail {
    #[error("Enter your first name.")]
    MissingFirstName,
    #[error("Enter your last name.")]
    MissingLastName,
    #[error("Names may only contain letters and spaces.")]
    InvalidName,
    #[error("Enter a valid email address.")]
    InvalidEmail,
    #[error("Passwords need at least 8 characters, an uppercase letter and a number.")]
    WeakPassword,
    #[error("Enter your date of birth.")]
    MissingBirthDate,
    #[error("You must be at least 10 years old to register.")]
    TooYoung,
    #[error("Phone numbers must have exactly 10 digits.")]
    InvalidPhone,
    #[error("Enter your country.")]
    MissingCountry,
}

/// The values of a [UserForm] that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDetails {
    pub profile: Profile,
    /// `None` only when the password was optional and left blank.
    pub password: Option<String>,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_owned()
}

fn is_valid_name(name: &str) -> bool {
    name.chars().all(|c| c.is_alphabetic() || c == ' ')
}

/// Something of the form `local@domain.tld` without any whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    match domain.rsplit_once('.') {
        Some((host, tld)) => !local.is_empty() && !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Age counts calendar years only, so someone born in December is a year
/// older on the first of January.
fn is_old_enough(birth_date: Date, today: Date) -> bool {
    today.year() - birth_date.year() >= MIN_AGE_YEARS
}

/// Check `form` against the rules for user details.
///
/// # Errors
/// Returns every problem found, in the order the fields appear on the form.
pub fn validate_details(
    form: &UserForm,
    today: Date,
    password_rule: PasswordRule,
) -> Result<ValidDetails, Vec<InvalidDetail>> {
    let mut problems = Vec::new();

    let first_name = trimmed(&form.first_name);
    let last_name = trimmed(&form.last_name);
    if first_name.is_empty() {
        problems.push(InvalidDetail::MissingFirstName);
    }
    if last_name.is_empty() {
        problems.push(InvalidDetail::MissingLastName);
    }
    if !is_valid_name(&first_name) || !is_valid_name(&last_name) {
        problems.push(InvalidDetail::InvalidName);
    }

    let email = trimmed(&form.email);
    if !is_valid_email(&email) {
        problems.push(InvalidDetail::InvalidEmail);
    }

    let password = form.password.clone().filter(|password| !password.is_empty());
    match (&password, password_rule) {
        (None, PasswordRule::Required) => problems.push(InvalidDetail::WeakPassword),
        (Some(password), _) if !is_strong_password(password) => {
            problems.push(InvalidDetail::WeakPassword)
        }
        _ => {}
    }

    let birth_date = match Date::parse(&trimmed(&form.birth_date), DATE_INPUT_FORMAT) {
        Ok(date) if is_old_enough(date, today) => Some(date),
        Ok(_) => {
            problems.push(InvalidDetail::TooYoung);
            None
        }
        Err(_) => {
            problems.push(InvalidDetail::MissingBirthDate);
            None
        }
    };

    let phone: String = trimmed(&form.phone)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        problems.push(InvalidDetail::InvalidPhone);
    }

    let country = trimmed(&form.country);
    if country.is_empty() {
        problems.push(InvalidDetail::MissingCountry);
    }

    if !problems.is_empty() {
        return Err(problems);
    }

    Ok(ValidDetails {
        profile: Profile {
            first_name,
            last_name,
            email,
            phone,
            country,
            birth_date,
        },
        password,
    })
}

/// The messages for a failed [validate_details].
pub fn problem_messages(problems: &[InvalidDetail]) -> Vec<String> {
    problems.iter().map(ToString::to_string).collect()
}

/// The list of problems at the top of a details form.
pub fn problem_list(problems: &[String]) -> Markup {
    html! {
        @if !problems.is_empty() {
            ul id="form-errors" role="alert" class="space-y-1 text-sm text-red-500 list-disc list-inside"
            {
                @for problem in problems {
                    li { (problem) }
                }
            }
        }
    }
}

fn text_field(
    name: &str,
    label: &str,
    type_: &str,
    value: Option<&str>,
    autocomplete: &str,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(type_)
                name=(name)
                id=(name)
                value=[value]
                autocomplete=(autocomplete)
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }
    }
}

/// The inputs for every detail except the password, filled in from `values`.
///
/// Passwords are never written back into the page.
pub fn details_fields(values: &UserForm) -> Markup {
    html! {
        div class="grid gap-4 sm:grid-cols-2"
        {
            (text_field("first_name", "First name", "text", values.first_name.as_deref(), "given-name"))
            (text_field("last_name", "Last name", "text", values.last_name.as_deref(), "family-name"))
        }

        (text_field("email", "Email", "email", values.email.as_deref(), "email"))

        div
        {
            label for="phone" class=(FORM_LABEL_STYLE) { "Phone number" }

            input
                type="tel"
                name="phone"
                id="phone"
                value=[values.phone.as_deref()]
                inputmode="numeric"
                pattern="[0-9]{10}"
                maxlength="10"
                placeholder="5512345678"
                autocomplete="tel-national"
                class=(FORM_TEXT_INPUT_STYLE)
                required;
        }

        (text_field("country", "Country", "text", values.country.as_deref(), "country-name"))
        (text_field("birth_date", "Date of birth", "date", values.birth_date.as_deref(), "bday"))
    }
}
