//! Validator for [`CarRecord`]s.
//!
//! The rule table below is the whole data-entry contract for a car. Each
//! rule is evaluated on its own; a record gets every failure in one pass.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::car::{fields, messages, CarRecord, CarStatus};
use crate::clock::{Clock, SystemClock};
use crate::error::CoreError;
use crate::validation::evaluator::RuleSet;
use crate::validation::rules::{Check, FieldSource, Rule, ValidationReport};
use crate::validation::submission::parse_submission;

pub const NAME_MAX_LENGTH: u64 = 100;
pub const MODEL_MAX_LENGTH: u64 = 50;
pub const OWNER_MAX_LENGTH: u64 = 100;
pub const YEAR_MIN: i64 = 1900;
pub const YEAR_MAX: i64 = 2100;
pub const COLOR_PATTERN: &str = "^[a-zA-Z]+$";

/// Smallest accepted total: one cent.
pub fn total_min() -> Decimal {
    Decimal::new(1, 2)
}

/// The declared rules for a car, in field declaration order.
pub fn car_rules() -> Result<Vec<Rule>, CoreError> {
    Ok(vec![
        Rule::new(fields::NAME, Check::Required, messages::NAME_REQUIRED),
        Rule::new(
            fields::NAME,
            Check::MaxLength(NAME_MAX_LENGTH),
            messages::NAME_LENGTH,
        ),
        Rule::new(fields::COLOR, Check::Required, messages::COLOR_REQUIRED),
        Rule::pattern(fields::COLOR, COLOR_PATTERN, messages::COLOR_PATTERN)?,
        Rule::new(fields::YEAR, Check::Required, messages::YEAR_REQUIRED),
        Rule::new(
            fields::YEAR,
            Check::IntRange {
                min: YEAR_MIN,
                max: YEAR_MAX,
            },
            messages::YEAR_RANGE,
        ),
        Rule::new(fields::MODEL, Check::Required, messages::MODEL_REQUIRED),
        Rule::new(
            fields::MODEL,
            Check::MaxLength(MODEL_MAX_LENGTH),
            messages::MODEL_LENGTH,
        ),
        Rule::new(fields::QUANTITY, Check::Required, messages::QUANTITY_REQUIRED),
        Rule::new(
            fields::QUANTITY,
            Check::IntRange {
                min: 1,
                max: i64::from(i32::MAX),
            },
            messages::QUANTITY_RANGE,
        ),
        Rule::new(
            fields::RELEASE_DATE,
            Check::Required,
            messages::RELEASE_DATE_REQUIRED,
        ),
        Rule::new(
            fields::RELEASE_DATE,
            Check::NotAfterToday,
            messages::RELEASE_DATE_FUTURE,
        ),
        Rule::new(
            fields::LAST_AVAILABLE_DATE,
            Check::Required,
            messages::LAST_AVAILABLE_DATE_REQUIRED,
        ),
        Rule::new(
            fields::LAST_AVAILABLE_DATE,
            Check::NotBefore(fields::RELEASE_DATE),
            messages::LAST_AVAILABLE_DATE_ORDER,
        ),
        Rule::new(fields::TOTAL, Check::Required, messages::TOTAL_REQUIRED),
        Rule::new(
            fields::TOTAL,
            Check::DecimalMin(total_min()),
            messages::TOTAL_RANGE,
        ),
        Rule::new(fields::OWNER, Check::Required, messages::OWNER_REQUIRED),
        Rule::new(
            fields::OWNER,
            Check::MaxLength(OWNER_MAX_LENGTH),
            messages::OWNER_LENGTH,
        ),
        Rule::new(fields::STATUS, Check::Required, messages::STATUS_REQUIRED),
        Rule::pattern(fields::STATUS, &CarStatus::pattern(), messages::STATUS_PATTERN)?,
    ])
}

/// Validates car records against [`car_rules`].
///
/// Holds no mutable state; one instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct RecordValidator<C = SystemClock> {
    rules: RuleSet<CarRecord>,
    clock: C,
}

impl RecordValidator<SystemClock> {
    /// Validator that compares release dates against the local date.
    pub fn new() -> Result<Self, CoreError> {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> RecordValidator<C> {
    pub fn with_clock(clock: C) -> Result<Self, CoreError> {
        Ok(Self {
            rules: RuleSet::new(car_rules()?)?,
            clock,
        })
    }

    /// Validate a typed record. The clock is read once per call.
    pub fn validate(&self, record: &CarRecord) -> Result<ValidationReport, CoreError> {
        self.validate_at(record, self.clock.today())
    }

    /// Validate a typed record as of `today`.
    pub fn validate_at(
        &self,
        record: &CarRecord,
        today: NaiveDate,
    ) -> Result<ValidationReport, CoreError> {
        let errors = self.rules.evaluate(record, today)?;
        let report = ValidationReport::from_errors(errors);
        tracing::debug!(
            is_valid = report.is_valid,
            error_count = report.errors.len(),
            %today,
            "Validated car record"
        );
        Ok(report)
    }

    /// Parse and validate an untyped payload.
    ///
    /// Format errors and rule failures are merged in field declaration order.
    /// A field whose value was supplied but unreadable reports only its
    /// format error, not "is required".
    pub fn validate_submission(
        &self,
        data: &Map<String, Value>,
    ) -> Result<ValidationReport, CoreError> {
        let today = self.clock.today();
        let submission = parse_submission(data);
        let rule_errors = self.rules.evaluate(&submission.record, today)?;

        let rule_errors: Vec<_> = rule_errors
            .into_iter()
            .filter(|e| {
                !(e.rule_type == Check::Required.name() && submission.is_malformed(&e.field))
            })
            .collect();
        let mut errors = submission.errors;
        errors.extend(rule_errors);
        errors.sort_by_key(|e| CarRecord::field_index(&e.field).unwrap_or(usize::MAX));

        let report = ValidationReport::from_errors(errors);
        tracing::debug!(
            is_valid = report.is_valid,
            error_count = report.errors.len(),
            %today,
            "Validated car submission"
        );
        Ok(report)
    }
}
