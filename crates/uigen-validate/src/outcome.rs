//! Validation outcomes

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field (`styles.indicatorColor`,
    /// `tabs[1].label`), `$` for the document itself
    pub path: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    /// Create field error
    #[inline]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Result of running a validator
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Candidate satisfies every constraint
    Accepted { value: Value },
    /// Every violation, in schema order
    Rejected { errors: Vec<FieldError> },
}

impl ValidationOutcome {
    /// Rejection with a single error
    #[inline]
    pub fn rejected(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            errors: vec![FieldError::new(path, message)],
        }
    }

    /// Whether the candidate was accepted
    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Errors of a rejection, empty when accepted
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Accepted { .. } => &[],
            Self::Rejected { errors } => errors,
        }
    }

    /// Convert into a `Result`
    ///
    /// # Errors
    /// The field errors when rejected.
    #[inline]
    pub fn into_result(self) -> Result<Value, Vec<FieldError>> {
        match self {
            Self::Accepted { value } => Ok(value),
            Self::Rejected { errors } => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_error_display() {
        let err = FieldError::new("styles.indicatorColor", "must be a hex color");
        assert_eq!(err.to_string(), "styles.indicatorColor: must be a hex color");
    }

    #[test]
    fn accessors() {
        let ok = ValidationOutcome::Accepted { value: json!({"a": 1}) };
        assert!(ok.is_accepted());
        assert!(ok.errors().is_empty());
        assert_eq!(ok.into_result().unwrap(), json!({"a": 1}));

        let bad = ValidationOutcome::rejected("value", "is required");
        assert!(!bad.is_accepted());
        assert_eq!(bad.errors().len(), 1);
        assert!(bad.into_result().is_err());
    }

    #[test]
    fn serializes_with_status_tag() {
        let bad = ValidationOutcome::rejected("$", "expected a JSON object, got array");
        let json = serde_json::to_value(&bad).unwrap();
        assert_eq!(json["status"], "rejected");
        assert_eq!(json["errors"][0]["path"], "$");
    }
}
