//! Conversion of untyped payloads into [`CarRecord`]s.
//!
//! Form and API payloads arrive as JSON objects. Values that cannot be read
//! as the field's type are reported here, as validation errors of that field,
//! and left unset in the resulting record.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::rules::ValidationError;
use crate::car::{fields, messages, CarRecord};

/// Rule type reported for values that could not be read at all.
pub const FORMAT_RULE: &str = "format";

/// A parsed payload: the typed record plus any format errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub record: CarRecord,
    pub errors: Vec<ValidationError>,
}

impl Submission {
    /// Whether `field` was supplied but could not be read.
    pub fn is_malformed(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

/// Read a JSON object into a [`CarRecord`]. Unknown keys are ignored.
pub fn parse_submission(data: &Map<String, Value>) -> Submission {
    let mut errors = Vec::new();

    let record = CarRecord {
        name: read_text(data.get(fields::NAME)),
        color: read_text(data.get(fields::COLOR)),
        year: read_integer(data, fields::YEAR, messages::YEAR_RANGE, &mut errors),
        model: read_text(data.get(fields::MODEL)),
        quantity: read_integer(data, fields::QUANTITY, messages::QUANTITY_RANGE, &mut errors),
        release_date: read_date(data, fields::RELEASE_DATE, &mut errors),
        last_available_date: read_date(data, fields::LAST_AVAILABLE_DATE, &mut errors),
        total: read_decimal(data, fields::TOTAL, messages::TOTAL_RANGE, &mut errors),
        owner: read_text(data.get(fields::OWNER)),
        status: read_text(data.get(fields::STATUS)),
    };

    Submission { record, errors }
}

/// Strings are taken as-is and numbers by their textual form. Anything else
/// counts as not supplied.
fn read_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Absent, null and blank values all count as not supplied.
fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn read_integer(
    data: &Map<String, Value>,
    field: &str,
    message: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<i32> {
    let value = present(data.get(field))?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(ValidationError::new(field, FORMAT_RULE, message));
    }
    parsed
}

fn read_decimal(
    data: &Map<String, Value>,
    field: &str,
    message: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<Decimal> {
    let value = present(data.get(field))?;
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    };
    if parsed.is_none() {
        errors.push(ValidationError::new(field, FORMAT_RULE, message));
    }
    parsed
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn read_date(
    data: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<NaiveDate> {
    let value = present(data.get(field))?;
    let parsed = value.as_str().and_then(|s| parse_date(s.trim()));
    if parsed.is_none() {
        errors.push(ValidationError::new(field, FORMAT_RULE, messages::INVALID_DATE));
    }
    parsed
}

/// Accepts `YYYY-MM-DD`, a naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamp, or
/// RFC 3339. Only the calendar date is kept.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
