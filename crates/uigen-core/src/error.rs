//! Error types for uigen Core
//!
//! Two layers:
//! - [`GenerationError`]: fatal caller errors, returned as `Err` before any
//!   backend call is made
//! - [`AttemptError`]: why a single attempt failed; always absorbed by the
//!   retry loop and turned into feedback

use crate::backend::BackendError;
use uigen_schema::SchemaError;
use uigen_validate::{ExtractError, FieldError};

/// Fatal request errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Kind tag unknown, or not valid for the requested operation
    #[error("unsupported artifact kind: '{0}'")]
    UnsupportedArtifactKind(String),

    /// Provider id unknown
    #[error("unsupported provider: '{0}'")]
    UnsupportedProvider(String),

    /// Request is structurally unusable
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Create invalid request error
    #[inline]
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

impl From<SchemaError> for GenerationError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::UnsupportedArtifactKind(kind) => Self::UnsupportedArtifactKind(kind),
            SchemaError::UnsupportedProvider(provider) => Self::UnsupportedProvider(provider),
        }
    }
}

/// Reason a single attempt was not accepted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttemptError {
    /// Backend produced no text
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// Text held no usable JSON object
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ExtractError),

    /// Config candidate violated its schema
    #[error("schema violation: {}", join(.0))]
    SchemaViolation(Vec<FieldError>),

    /// Generated source failed to parse or used forbidden components
    #[error("compilation failed: {}", join(.0))]
    Compilation(Vec<FieldError>),
}

impl AttemptError {
    /// Lines handed to the next prompt as prior errors
    ///
    /// Field-level failures keep one `path: message` line per violation so
    /// the generator sees every problem, not a summary.
    #[must_use]
    pub fn feedback_lines(&self) -> Vec<String> {
        match self {
            Self::Backend(err) => vec![format!("the generation request failed: {err}")],
            Self::MalformedResponse(err) => vec![format!(
                "the response could not be parsed: {err}; reply with one raw JSON object"
            )],
            Self::SchemaViolation(errors) | Self::Compilation(errors) => {
                errors.iter().map(ToString::to_string).collect()
            }
        }
    }

    /// Field errors carried by the failure, empty for backend and extraction
    /// failures
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::SchemaViolation(errors) | Self::Compilation(errors) => errors,
            Self::Backend(_) | Self::MalformedResponse(_) => &[],
        }
    }

    /// Whether the backend reported a failure likely to clear on retry
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Backend(err) if err.is_transient())
    }

    /// Short stable label used in logs
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Backend(_) => "backend",
            Self::MalformedResponse(_) => "malformed_response",
            Self::SchemaViolation(_) => "schema_violation",
            Self::Compilation(_) => "compilation",
        }
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
