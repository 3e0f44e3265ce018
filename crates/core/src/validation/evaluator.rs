//! Rule evaluator. Pure logic; the only outside input is the date handed in.

use std::marker::PhantomData;

use chrono::NaiveDate;
use regex::Regex;
use validator::{ValidateLength, ValidateRange};

use super::rules::{Check, FieldKind, FieldSource, FieldValue, Rule, ValidationError};
use crate::error::CoreError;

/// An ordered rule table bound to one record type.
///
/// Construction checks every rule against `R::FIELDS`, so a table that names
/// a field the record does not have is rejected before any data is seen.
/// Rules are kept in field declaration order; rules on the same field keep
/// the order they were declared in.
#[derive(Debug, Clone)]
pub struct RuleSet<R> {
    rules: Vec<Rule>,
    _record: PhantomData<fn(&R)>,
}

impl<R: FieldSource> RuleSet<R> {
    pub fn new(mut rules: Vec<Rule>) -> Result<Self, CoreError> {
        for rule in &rules {
            check_wiring::<R>(rule)?;
        }
        rules.sort_by_key(|rule| R::field_index(rule.field).unwrap_or(usize::MAX));

        Ok(Self {
            rules,
            _record: PhantomData,
        })
    }

    /// Evaluate every rule against `record`. Each rule runs regardless of
    /// the outcome of the others.
    pub fn evaluate(
        &self,
        record: &R,
        today: NaiveDate,
    ) -> Result<Vec<ValidationError>, CoreError> {
        let mut errors = Vec::new();

        for rule in &self.rules {
            if evaluate_single_rule(rule, record, today)? {
                tracing::trace!(field = rule.field, rule = rule.check.name(), "rule failed");
                errors.push(ValidationError::new(
                    rule.field,
                    rule.check.name(),
                    rule.message,
                ));
            }
        }

        Ok(errors)
    }
}

fn check_wiring<R: FieldSource>(rule: &Rule) -> Result<(), CoreError> {
    let kind = R::field_kind(rule.field).ok_or_else(|| CoreError::UnknownField {
        field: rule.field.to_string(),
    })?;
    if !rule.check.applies_to(kind) {
        return Err(CoreError::IncompatibleCheck {
            field: rule.field.to_string(),
            check: rule.check.name(),
            kind,
        });
    }

    if let Check::NotBefore(depends_on) = &rule.check {
        let dep_kind = R::field_kind(depends_on).ok_or_else(|| CoreError::UnknownDependency {
            field: rule.field.to_string(),
            depends_on: depends_on.to_string(),
        })?;
        if dep_kind != FieldKind::Date {
            return Err(CoreError::IncompatibleCheck {
                field: depends_on.to_string(),
                check: rule.check.name(),
                kind: dep_kind,
            });
        }
    }
    Ok(())
}

fn lookup<'r, R: FieldSource>(record: &'r R, field: &str) -> Result<FieldValue<'r>, CoreError> {
    record.field(field).ok_or_else(|| CoreError::UnknownField {
        field: field.to_string(),
    })
}

/// Returns `true` when the rule is violated. Every check except
/// [`Check::Required`] passes on a missing value.
fn evaluate_single_rule<R: FieldSource>(
    rule: &Rule,
    record: &R,
    today: NaiveDate,
) -> Result<bool, CoreError> {
    let value = lookup(record, rule.field)?;
    if let Check::Required = rule.check {
        return Ok(value.is_missing());
    }
    if value.is_missing() {
        return Ok(false);
    }

    let failed = match (&rule.check, value) {
        (Check::MaxLength(max), FieldValue::Text(Some(text))) => {
            !ValidateLength::<u64>::validate_length(&text, None, Some(*max), None)
        }
        (Check::Pattern(regex), FieldValue::Text(Some(text))) => {
            !is_full_match(regex, text)
        }
        (Check::IntRange { min, max }, FieldValue::Integer(Some(n))) => {
            !ValidateRange::<i64>::validate_range(&n, Some(*min), Some(*max), None, None)
        }
        (Check::DecimalMin(min), FieldValue::Decimal(Some(amount))) => amount < *min,
        (Check::NotAfterToday, FieldValue::Date(Some(date))) => date > today,
        (Check::NotBefore(depends_on), FieldValue::Date(Some(date))) => {
            match lookup(record, depends_on)? {
                FieldValue::Date(Some(other)) => date < other,
                FieldValue::Date(None) => false,
                other => {
                    return Err(CoreError::IncompatibleCheck {
                        field: depends_on.to_string(),
                        check: rule.check.name(),
                        kind: other.kind(),
                    })
                }
            }
        }
        _ => false,
    };
    Ok(failed)
}

/// The match must cover the whole input, anchors or not.
fn is_full_match(regex: &Regex, text: &str) -> bool {
    regex
        .find(text)
        .is_some_and(|m| m.start() == 0 && m.end() == text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;

    #[derive(Debug, Default)]
    struct Booking {
        guest: Option<String>,
        nights: Option<i64>,
        deposit: Option<Decimal>,
        check_in: Option<NaiveDate>,
        check_out: Option<NaiveDate>,
    }

    impl FieldSource for Booking {
        const FIELDS: &'static [(&'static str, FieldKind)] = &[
            ("guest", FieldKind::Text),
            ("nights", FieldKind::Integer),
            ("deposit", FieldKind::Decimal),
            ("checkIn", FieldKind::Date),
            ("checkOut", FieldKind::Date),
        ];

        fn field(&self, name: &str) -> Option<FieldValue<'_>> {
            Some(match name {
                "guest" => FieldValue::Text(self.guest.as_deref()),
                "nights" => FieldValue::Integer(self.nights),
                "deposit" => FieldValue::Decimal(self.deposit),
                "checkIn" => FieldValue::Date(self.check_in),
                "checkOut" => FieldValue::Date(self.check_out),
                _ => return None,
            })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 1, 1)
    }

    fn evaluate(rules: Vec<Rule>, record: &Booking) -> Vec<ValidationError> {
        RuleSet::<Booking>::new(rules)
            .unwrap()
            .evaluate(record, today())
            .unwrap()
    }

    #[test]
    fn required_fails_missing_field() {
        let errors = evaluate(
            vec![Rule::new("guest", Check::Required, "guest failed")],
            &Booking::default(),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].rule_type, "required");
        assert_eq!(errors[0].message, "guest failed");
    }

    #[test]
    fn required_passes_with_value() {
        let record = Booking {
            guest: Some("Ada".into()),
            ..Default::default()
        };
        let errors = evaluate(vec![Rule::new("guest", Check::Required, "x")], &record);
        assert!(errors.is_empty());
    }

    #[test]
    fn max_length_counts_characters_not_bytes() {
        let record = Booking {
            guest: Some("ééé".into()),
            ..Default::default()
        };
        let errors = evaluate(vec![Rule::new("guest", Check::MaxLength(3), "x")], &record);
        assert!(errors.is_empty());

        let errors = evaluate(vec![Rule::new("guest", Check::MaxLength(2), "x")], &record);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn pattern_requires_full_match() {
        let record = Booking {
            guest: Some("Ada1".into()),
            ..Default::default()
        };
        let rule = Rule::pattern("guest", "[a-zA-Z]+", "letters only").unwrap();
        let errors = evaluate(vec![rule], &record);
        assert_eq!(errors[0].message, "letters only");
    }

    #[test]
    fn range_is_inclusive() {
        let rule = || Rule::new("nights", Check::IntRange { min: 1, max: 30 }, "x");
        for (nights, ok) in [(0, false), (1, true), (30, true), (31, false)] {
            let record = Booking {
                nights: Some(nights),
                ..Default::default()
            };
            assert_eq!(evaluate(vec![rule()], &record).is_empty(), ok, "nights = {nights}");
        }
    }

    #[test]
    fn decimal_min_is_inclusive() {
        let rule = || Rule::new("deposit", Check::DecimalMin(Decimal::new(1, 2)), "x");
        let at_min = Booking {
            deposit: Some(Decimal::new(1, 2)),
            ..Default::default()
        };
        let below = Booking {
            deposit: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(evaluate(vec![rule()], &at_min).is_empty());
        assert_eq!(evaluate(vec![rule()], &below).len(), 1);
    }

    #[test]
    fn not_after_today_allows_today() {
        let rule = || Rule::new("checkIn", Check::NotAfterToday, "x");
        let on_day = Booking {
            check_in: Some(today()),
            ..Default::default()
        };
        let next_day = Booking {
            check_in: today().succ_opt(),
            ..Default::default()
        };
        assert!(evaluate(vec![rule()], &on_day).is_empty());
        assert_eq!(evaluate(vec![rule()], &next_day).len(), 1);
    }

    #[test]
    fn not_before_compares_against_dependency() {
        let rule = || Rule::new("checkOut", Check::NotBefore("checkIn"), "x");
        let same_day = Booking {
            check_in: Some(date(2024, 5, 1)),
            check_out: Some(date(2024, 5, 1)),
            ..Default::default()
        };
        let earlier = Booking {
            check_in: Some(date(2024, 5, 1)),
            check_out: Some(date(2024, 4, 30)),
            ..Default::default()
        };
        let no_dependency = Booking {
            check_out: Some(date(2024, 4, 30)),
            ..Default::default()
        };
        assert!(evaluate(vec![rule()], &same_day).is_empty());
        assert_eq!(evaluate(vec![rule()], &earlier).len(), 1);
        assert!(evaluate(vec![rule()], &no_dependency).is_empty());
    }

    #[test]
    fn non_required_checks_skip_missing_values() {
        let rules = vec![
            Rule::new("guest", Check::MaxLength(1), "x"),
            Rule::pattern("guest", "^[a-z]+$", "x").unwrap(),
            Rule::new("nights", Check::IntRange { min: 1, max: 2 }, "x"),
            Rule::new("deposit", Check::DecimalMin(Decimal::ONE), "x"),
            Rule::new("checkIn", Check::NotAfterToday, "x"),
            Rule::new("checkOut", Check::NotBefore("checkIn"), "x"),
        ];
        assert!(evaluate(rules, &Booking::default()).is_empty());
    }

    /// Blank text is missing, so only the required rule reports it.
    #[test]
    fn blank_text_skips_length_and_pattern() {
        let record = Booking {
            guest: Some("   ".into()),
            ..Default::default()
        };
        let rules = vec![
            Rule::new("guest", Check::Required, "guest required"),
            Rule::new("guest", Check::MaxLength(1), "too long"),
            Rule::pattern("guest", "^[a-z]+$", "letters only").unwrap(),
        ];
        let errors = evaluate(rules, &record);
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["guest required"]);
    }

    #[test]
    fn results_follow_field_declaration_order() {
        let rules = vec![
            Rule::new("checkIn", Check::Required, "check-in"),
            Rule::new("guest", Check::Required, "guest"),
            Rule::new("nights", Check::Required, "nights"),
        ];
        let errors = evaluate(rules, &Booking::default());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["guest", "nights", "checkIn"]);
    }

    #[test]
    fn unknown_field_is_a_configuration_error() {
        let result = RuleSet::<Booking>::new(vec![Rule::new("room", Check::Required, "x")]);
        assert_matches!(result, Err(CoreError::UnknownField { field }) if field == "room");
    }

    #[test]
    fn unknown_dependency_is_a_configuration_error() {
        let result = RuleSet::<Booking>::new(vec![Rule::new(
            "checkOut",
            Check::NotBefore("arrival"),
            "x",
        )]);
        assert_matches!(
            result,
            Err(CoreError::UnknownDependency { depends_on, .. }) if depends_on == "arrival"
        );
    }

    #[test]
    fn dependency_must_be_a_date() {
        let result = RuleSet::<Booking>::new(vec![Rule::new(
            "checkOut",
            Check::NotBefore("guest"),
            "x",
        )]);
        assert_matches!(
            result,
            Err(CoreError::IncompatibleCheck { field, kind: FieldKind::Text, .. }) if field == "guest"
        );
    }

    #[test]
    fn check_must_fit_field_kind() {
        let result = RuleSet::<Booking>::new(vec![Rule::new("nights", Check::MaxLength(2), "x")]);
        assert_matches!(
            result,
            Err(CoreError::IncompatibleCheck { check: "max_length", kind: FieldKind::Integer, .. })
        );
    }
}
