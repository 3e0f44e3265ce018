//! Validation rule and result types.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The declared type of a record field, as seen by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
}

/// Borrowed view of one field's value. `None` is the "not supplied" sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Integer(Option<i64>),
    Decimal(Option<Decimal>),
    Date(Option<NaiveDate>),
}

impl FieldValue<'_> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Decimal(_) => FieldKind::Decimal,
            FieldValue::Date(_) => FieldKind::Date,
        }
    }

    /// Whether the value counts as absent. Blank text is absent too.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.map_or(true, |s| s.trim().is_empty()),
            FieldValue::Integer(n) => n.is_none(),
            FieldValue::Decimal(d) => d.is_none(),
            FieldValue::Date(d) => d.is_none(),
        }
    }
}

/// A record whose fields can be looked up by name.
pub trait FieldSource {
    /// Every field of the record, in declaration order.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Current value of `name`, or `None` when the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;

    fn field_kind(name: &str) -> Option<FieldKind> {
        Self::FIELDS
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, kind)| *kind)
    }

    fn field_index(name: &str) -> Option<usize> {
        Self::FIELDS.iter().position(|(field, _)| *field == name)
    }
}

/// The predicate half of a rule.
#[derive(Debug, Clone)]
pub enum Check {
    /// Value must be supplied (non-blank for text).
    Required,
    /// Text may hold at most this many characters.
    MaxLength(u64),
    /// Text must match the whole pattern.
    Pattern(Regex),
    /// Inclusive integer range.
    IntRange { min: i64, max: i64 },
    /// Inclusive decimal lower bound.
    DecimalMin(Decimal),
    /// Date must not be later than the validation date.
    NotAfterToday,
    /// Date must not be earlier than the named date field of the same record.
    NotBefore(&'static str),
}

impl Check {
    /// Stable identifier reported alongside each violation.
    pub fn name(&self) -> &'static str {
        match self {
            Check::Required => "required",
            Check::MaxLength(_) => "max_length",
            Check::Pattern(_) => "regex_pattern",
            Check::IntRange { .. } => "range",
            Check::DecimalMin(_) => "min_value",
            Check::NotAfterToday => "not_after_today",
            Check::NotBefore(_) => "not_before",
        }
    }

    pub fn applies_to(&self, kind: FieldKind) -> bool {
        match self {
            Check::Required => true,
            Check::MaxLength(_) | Check::Pattern(_) => kind == FieldKind::Text,
            Check::IntRange { .. } => kind == FieldKind::Integer,
            Check::DecimalMin(_) => kind == FieldKind::Decimal,
            Check::NotAfterToday | Check::NotBefore(_) => kind == FieldKind::Date,
        }
    }
}

/// One declared rule: which field, what to check, what to say on failure.
#[derive(Debug, Clone)]
pub struct Rule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl Rule {
    pub fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }

    /// Build a [`Check::Pattern`] rule, compiling `pattern` up front.
    pub fn pattern(
        field: &'static str,
        pattern: &str,
        message: &'static str,
    ) -> Result<Self, CoreError> {
        let regex = Regex::new(pattern).map_err(|source| CoreError::InvalidPattern {
            field: field.to_string(),
            source,
        })?;
        Ok(Self::new(field, Check::Pattern(regex), message))
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub rule_type: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, rule_type: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            rule_type: rule_type.to_string(),
            message: message.to_string(),
        }
    }
}

/// Aggregated result of validating one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Violations attributed to `field`, in evaluation order.
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.field == field)
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}
