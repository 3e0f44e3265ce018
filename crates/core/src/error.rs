use crate::validation::rules::FieldKind;

/// Errors raised by the validation engine itself.
///
/// Bad input data is never reported through this type; it ends up in a
/// [`ValidationReport`](crate::validation::rules::ValidationReport). These
/// variants mean the rule table does not fit the record it is applied to.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown field: {field}")]
    UnknownField { field: String },

    #[error("Rule on {field} depends on unknown field: {depends_on}")]
    UnknownDependency { field: String, depends_on: String },

    #[error("Check {check} cannot be applied to {kind:?} field {field}")]
    IncompatibleCheck {
        field: String,
        check: &'static str,
        kind: FieldKind,
    },

    #[error("Invalid pattern for {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}
