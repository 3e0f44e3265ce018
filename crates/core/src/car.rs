//! The car data-entry record.
//!
//! Every field is optional in memory so that "not supplied" stays distinct
//! from zero, the epoch, or an empty string. Whether a field is required is a
//! rule, not a type-level fact.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::rules::{FieldKind, FieldSource, FieldValue};

/// Wire names of the record's fields. Errors are attributed using these.
pub mod fields {
    pub const NAME: &str = "name";
    pub const COLOR: &str = "color";
    pub const YEAR: &str = "year";
    pub const MODEL: &str = "model";
    pub const QUANTITY: &str = "quantity";
    pub const RELEASE_DATE: &str = "releaseDate";
    pub const LAST_AVAILABLE_DATE: &str = "lastAvailableDate";
    pub const TOTAL: &str = "total";
    pub const OWNER: &str = "owner";
    pub const STATUS: &str = "status";
}

/// User-facing failure messages.
pub mod messages {
    pub const NAME_REQUIRED: &str = "Name is required.";
    pub const NAME_LENGTH: &str = "Name cannot exceed 100 characters.";
    pub const COLOR_REQUIRED: &str = "Color is required.";
    pub const COLOR_PATTERN: &str = "Color can only contain alphabetic characters.";
    pub const YEAR_REQUIRED: &str = "Year is required.";
    pub const YEAR_RANGE: &str = "Year must be between 1900 and 2100.";
    pub const MODEL_REQUIRED: &str = "Model is required.";
    pub const MODEL_LENGTH: &str = "Model cannot exceed 50 characters.";
    pub const QUANTITY_REQUIRED: &str = "Quantity is required.";
    pub const QUANTITY_RANGE: &str = "Quantity must be greater than 0.";
    pub const RELEASE_DATE_REQUIRED: &str = "ReleaseDate is required.";
    pub const RELEASE_DATE_FUTURE: &str = "ReleaseDate must be a past or present date.";
    pub const LAST_AVAILABLE_DATE_REQUIRED: &str = "LastAvailableDate is required.";
    pub const LAST_AVAILABLE_DATE_ORDER: &str =
        "LastAvailableDate must be on or after the ReleaseDate.";
    pub const INVALID_DATE: &str = "Invalid date format.";
    pub const TOTAL_REQUIRED: &str = "Total is required.";
    pub const TOTAL_RANGE: &str = "Total must be greater than 0.";
    pub const OWNER_REQUIRED: &str = "Owner is required.";
    pub const OWNER_LENGTH: &str = "Owner name cannot exceed 100 characters.";
    pub const STATUS_REQUIRED: &str = "Status is required.";
    pub const STATUS_PATTERN: &str =
        "Status must be 'Available', 'Unavailable', or 'Discontinued'.";
}

/// A car as submitted through data entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarRecord {
    pub name: Option<String>,
    pub color: Option<String>,
    pub year: Option<i32>,
    pub model: Option<String>,
    pub quantity: Option<i32>,
    pub release_date: Option<NaiveDate>,
    pub last_available_date: Option<NaiveDate>,
    pub total: Option<Decimal>,
    pub owner: Option<String>,
    pub status: Option<String>,
}

impl FieldSource for CarRecord {
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        (fields::NAME, FieldKind::Text),
        (fields::COLOR, FieldKind::Text),
        (fields::YEAR, FieldKind::Integer),
        (fields::MODEL, FieldKind::Text),
        (fields::QUANTITY, FieldKind::Integer),
        (fields::RELEASE_DATE, FieldKind::Date),
        (fields::LAST_AVAILABLE_DATE, FieldKind::Date),
        (fields::TOTAL, FieldKind::Decimal),
        (fields::OWNER, FieldKind::Text),
        (fields::STATUS, FieldKind::Text),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            fields::NAME => FieldValue::Text(self.name.as_deref()),
            fields::COLOR => FieldValue::Text(self.color.as_deref()),
            fields::YEAR => FieldValue::Integer(self.year.map(i64::from)),
            fields::MODEL => FieldValue::Text(self.model.as_deref()),
            fields::QUANTITY => FieldValue::Integer(self.quantity.map(i64::from)),
            fields::RELEASE_DATE => FieldValue::Date(self.release_date),
            fields::LAST_AVAILABLE_DATE => FieldValue::Date(self.last_available_date),
            fields::TOTAL => FieldValue::Decimal(self.total),
            fields::OWNER => FieldValue::Text(self.owner.as_deref()),
            fields::STATUS => FieldValue::Text(self.status.as_deref()),
            _ => return None,
        };
        Some(value)
    }
}

/// Lifecycle state of a car listing. Parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarStatus {
    Available,
    Unavailable,
    Discontinued,
}

impl CarStatus {
    pub const ALL: [CarStatus; 3] = [
        CarStatus::Available,
        CarStatus::Unavailable,
        CarStatus::Discontinued,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CarStatus::Available => "Available",
            CarStatus::Unavailable => "Unavailable",
            CarStatus::Discontinued => "Discontinued",
        }
    }

    /// Anchored alternation of every status name, e.g. `^(Available|...)$`.
    pub fn pattern() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
        format!("^({})$", names.join("|"))
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown car status: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_pattern_lists_every_variant() {
        assert_eq!(
            CarStatus::pattern(),
            "^(Available|Unavailable|Discontinued)$"
        );
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        assert_eq!("Available".parse::<CarStatus>().unwrap(), CarStatus::Available);
        assert!("available".parse::<CarStatus>().is_err());
    }

    #[test]
    fn every_declared_field_is_addressable() {
        let record = CarRecord::default();
        for (name, kind) in CarRecord::FIELDS {
            let value = record.field(name).expect("declared field should resolve");
            assert_eq!(value.kind(), *kind, "field {name}");
            assert!(value.is_missing(), "field {name}");
        }
        assert!(record.field("mileage").is_none());
    }

    #[test]
    fn deserializes_camel_case_names() {
        let record: CarRecord = serde_json::from_str(
            r#"{"name":"Model X","releaseDate":"2024-01-01","lastAvailableDate":"2024-06-01"}"#,
        )
        .unwrap();
        assert_eq!(record.name.as_deref(), Some("Model X"));
        assert_eq!(record.release_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(record.last_available_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(record.total, None);
    }
}
