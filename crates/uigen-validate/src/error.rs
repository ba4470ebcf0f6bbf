//! Error types for response extraction

/// Reasons a generator response could not be turned into a candidate
///
/// All variants are retryable: the message is fed back to the generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// Response was empty or whitespace
    #[error("response was empty")]
    Empty,

    /// No parseable JSON could be located
    #[error("no valid JSON object found: {0}")]
    InvalidJson(String),

    /// JSON parsed but was not an object
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// Required source key absent from the object
    #[error("missing \"{0}\" key in response object")]
    MissingSource(String),

    /// Source key present but not a string
    #[error("\"{0}\" must be a string of source code")]
    SourceNotString(String),
}

impl ExtractError {
    /// Create invalid JSON error from a parser error
    pub fn invalid_json(err: impl std::fmt::Display) -> Self {
        Self::InvalidJson(err.to_string())
    }
}
