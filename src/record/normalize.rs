//! Maps the backend's loosely shaped JSON records onto [ExpenseRecord] and [IncomeRecord].
//!
//! The backend has used several spellings for the same field over time (e.g.
//! `fechaGasto` and `fechagasto`), amounts arrive either as JSON numbers or as
//! numeric text, and dates arrive either as plain calendar dates or as full
//! RFC 3339 date-times. All of that is resolved here so that the period filter
//! and the aggregation only ever see one canonical shape.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::record::model::{CategoryId, ExpenseRecord, IncomeRecord, RecordKind};

/// How to treat records with unreadable amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationMode {
    /// Missing or unreadable amounts count as zero. Records without a
    /// readable date are dropped since they can never fall inside a period.
    #[default]
    Lenient,
    /// Any record with a missing, unreadable or negative amount, or a
    /// missing or unreadable date, is rejected.
    Strict,
}

/// Why a raw record could not be turned into a canonical record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectionReason {
    /// The record was not a JSON object.
    #[error("the record is not a JSON object")]
    NotAnObject,

    /// None of the accepted spellings of a required field were present.
    #[error("the {0} field is missing")]
    MissingField(&'static str),

    /// The amount could not be read as a decimal number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The amount was below zero.
    #[error("the amount {0} is negative")]
    NegativeAmount(Decimal),

    /// The date could not be read as a calendar date or date-time.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),
}

/// A raw record that did not make it through normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRejection {
    /// The position of the record in the backend's response.
    pub index: usize,
    /// Whether the record was an expense or income record.
    pub kind: RecordKind,
    /// What was wrong with the record.
    pub reason: RejectionReason,
}

impl Display for RecordRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} record #{}: {}", self.kind, self.index, self.reason)
    }
}

/// The records that were normalized along with the ones that were rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<R> {
    /// The canonical records, in the order the backend returned them.
    pub records: Vec<R>,
    /// The records that were dropped, in the order the backend returned them.
    pub rejected: Vec<RecordRejection>,
}

/// The accepted spellings of each logical field, in priority order.
struct FieldAliases {
    amount: &'static [&'static str],
    date: &'static [&'static str],
    label: &'static [&'static str],
    category: &'static [&'static str],
}

const EXPENSE_FIELDS: FieldAliases = FieldAliases {
    amount: &["cantidadGasto", "cantidadgasto"],
    date: &["fechaGasto", "fechagasto"],
    label: &[
        "descripcionGasto",
        "descripciongasto",
        "nombreGasto",
        "nombregasto",
    ],
    category: &["idCategoria", "idcategoria"],
};

const INCOME_FIELDS: FieldAliases = FieldAliases {
    amount: &["cantidadIngreso", "cantidadingreso"],
    date: &[
        "fechaIngreso",
        "fechaRecibido",
        "fechaingreso",
        "fecharecibido",
    ],
    label: &[
        "origenIngreso",
        "origeningreso",
        "descripcionIngreso",
        "descripcioningreso",
    ],
    category: &[],
};

/// The fields shared by both kinds of record.
struct CommonFields {
    amount: Decimal,
    date: Date,
    label: String,
    category: Option<CategoryId>,
}

/// Normalize the raw expense objects returned by the backend.
///
/// Date-times with a UTC offset are converted to `local_offset` before the
/// calendar date is taken.
pub fn normalize_expenses(
    raw: &[Value],
    mode: NormalizationMode,
    local_offset: UtcOffset,
) -> Normalized<ExpenseRecord> {
    normalize(
        raw,
        RecordKind::Expense,
        &EXPENSE_FIELDS,
        mode,
        local_offset,
        |fields| ExpenseRecord {
            amount: fields.amount,
            date: fields.date,
            description: fields.label,
            category: fields.category,
        },
    )
}

/// Normalize the raw income objects returned by the backend.
///
/// Date-times with a UTC offset are converted to `local_offset` before the
/// calendar date is taken.
pub fn normalize_income(
    raw: &[Value],
    mode: NormalizationMode,
    local_offset: UtcOffset,
) -> Normalized<IncomeRecord> {
    normalize(
        raw,
        RecordKind::Income,
        &INCOME_FIELDS,
        mode,
        local_offset,
        |fields| IncomeRecord {
            amount: fields.amount,
            date: fields.date,
            origin: fields.label,
        },
    )
}

fn normalize<R>(
    raw: &[Value],
    kind: RecordKind,
    aliases: &FieldAliases,
    mode: NormalizationMode,
    local_offset: UtcOffset,
    build: impl Fn(CommonFields) -> R,
) -> Normalized<R> {
    let mut normalized = Normalized {
        records: Vec::with_capacity(raw.len()),
        rejected: Vec::new(),
    };

    for (index, value) in raw.iter().enumerate() {
        match read_fields(value, aliases, mode, local_offset) {
            Ok(fields) => normalized.records.push(build(fields)),
            Err(reason) => {
                let rejection = RecordRejection {
                    index,
                    kind,
                    reason,
                };
                tracing::debug!("Dropping {rejection}");
                normalized.rejected.push(rejection);
            }
        }
    }

    normalized
}

fn read_fields(
    value: &Value,
    aliases: &FieldAliases,
    mode: NormalizationMode,
    local_offset: UtcOffset,
) -> Result<CommonFields, RejectionReason> {
    let object = value.as_object().ok_or(RejectionReason::NotAnObject)?;

    let amount = match (read_amount(object, aliases.amount), mode) {
        (Ok(amount), NormalizationMode::Strict) if amount < Decimal::ZERO => {
            return Err(RejectionReason::NegativeAmount(amount));
        }
        (Ok(amount), _) => amount,
        (Err(reason), NormalizationMode::Strict) => return Err(reason),
        (Err(reason), NormalizationMode::Lenient) => {
            tracing::debug!("Counting unreadable amount as zero: {reason}");
            Decimal::ZERO
        }
    };

    let date = read_date(object, aliases.date, local_offset)?;

    let label = first_present(object, aliases.label)
        .map(value_to_text)
        .unwrap_or_default();

    let category = first_present(object, aliases.category).and_then(|value| match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    });

    Ok(CommonFields {
        amount,
        date,
        label,
        category,
    })
}

/// Get the first spelling of a field that holds a non-blank value.
fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !is_blank(value))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

fn read_amount(object: &Map<String, Value>, keys: &[&str]) -> Result<Decimal, RejectionReason> {
    match first_present(object, keys) {
        None => Err(RejectionReason::MissingField("amount")),
        Some(Value::Number(number)) => parse_amount(&number.to_string()),
        Some(Value::String(text)) => parse_amount(text),
        Some(other) => Err(RejectionReason::InvalidAmount(other.to_string())),
    }
}

/// Parse numeric text, e.g. "40.50", "  12 " or "1e3", as a decimal amount.
pub fn parse_amount(text: &str) -> Result<Decimal, RejectionReason> {
    let text = text.trim();

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map(|amount| amount.normalize())
        .map_err(|_| RejectionReason::InvalidAmount(text.to_owned()))
}

fn read_date(
    object: &Map<String, Value>,
    keys: &[&str],
    local_offset: UtcOffset,
) -> Result<Date, RejectionReason> {
    match first_present(object, keys) {
        None => Err(RejectionReason::MissingField("date")),
        Some(Value::String(text)) => parse_date(text, local_offset),
        Some(other) => Err(RejectionReason::InvalidDate(other.to_string())),
    }
}

/// Parse a calendar date from the formats the backend is known to send.
///
/// Plain dates ("2024-03-15") are taken as-is. Date-times with an offset
/// ("2024-03-15T05:00:00.000Z") are shifted to `local_offset` first. Date-times
/// without an offset ("2024-03-15 10:30:00") are assumed to be local already.
pub fn parse_date(text: &str, local_offset: UtcOffset) -> Result<Date, RejectionReason> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(date_time.to_offset(local_offset).date());
    }

    PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            text,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .map(|date_time| date_time.date())
    .map_err(|_| RejectionReason::InvalidDate(text.to_owned()))
}
