//! Text-generation backend seam
//!
//! The orchestrator only ever sees `generate(prompt) -> text`. Concrete
//! clients live outside this crate.

use async_trait::async_trait;

/// Opaque, non-deterministic text generator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Produce a completion for `prompt`
    ///
    /// # Errors
    /// `BackendError` on any failure to obtain text.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Backend failures
///
/// Inside the retry loop every variant becomes feedback for the next
/// attempt. `MissingCredentials` is only fatal at construction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Credential environment variable absent or empty
    #[error("missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),

    /// Provider rate limit or quota hit
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Connection, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Body could not be decoded or held no text
    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    /// Non-success HTTP status
    #[error("backend returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
}

impl BackendError {
    /// Create transport error
    #[inline]
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create invalid response error
    #[inline]
    pub fn invalid_response(err: impl std::fmt::Display) -> Self {
        Self::InvalidResponse(err.to_string())
    }

    /// Check if the failure is likely to clear on its own
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::QuotaExceeded(_) | Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MissingCredentials(_) | Self::InvalidResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(BackendError::transport("connection reset").is_transient());
        assert!(BackendError::Status { status: 503, message: String::new() }.is_transient());
        assert!(!BackendError::Status { status: 400, message: String::new() }.is_transient());
        assert!(!BackendError::MissingCredentials("GEMINI_API_KEY".into()).is_transient());
    }

    #[test]
    fn messages() {
        assert_eq!(
            BackendError::Status { status: 429, message: "slow down".into() }.to_string(),
            "backend returned HTTP 429: slow down"
        );
    }

    #[tokio::test]
    async fn mock_backend_returns_scripted_text() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_| Ok("{}".to_string()));
        assert_eq!(backend.generate("prompt").await.unwrap(), "{}");
    }
}
