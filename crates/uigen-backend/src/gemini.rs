//! `generateContent` client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uigen_core::{BackendConfig, BackendError, GenerationBackend};

/// HTTP backend for `models/{model}:generateContent`
pub struct GeminiBackend {
    http_client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiBackend {
    /// Build from config, reading the key from `config.api_key_env`
    ///
    /// # Errors
    /// `MissingCredentials` when the variable is unset or blank,
    /// `Transport` when the HTTP client cannot be built.
    pub fn from_env(config: &BackendConfig) -> Result<Self, BackendError> {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    /// Build from config with an arbitrary variable lookup
    ///
    /// # Errors
    /// Same as [`Self::from_env`].
    pub fn from_lookup(config: &BackendConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BackendError> {
        let api_key = lookup(&config.api_key_env)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| BackendError::MissingCredentials(config.api_key_env.clone()))?;
        Self::with_api_key(config, api_key)
    }

    /// Build from config with an explicit key
    ///
    /// # Errors
    /// `Transport` when the HTTP client cannot be built.
    pub fn with_api_key(config: &BackendConfig, api_key: impl Into<String>) -> Result<Self, BackendError> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::transport)?;

        Ok(Self {
            http_client,
            url: endpoint_url(&config.endpoint, &config.model),
            api_key: api_key.into(),
            model: config.model.clone(),
            timeout,
        })
    }

    /// Full request URL
    #[inline]
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Model name
    #[inline]
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        tracing::debug!(model = %self.model, prompt_bytes = prompt.len(), "sending generateContent request");

        let response = self
            .http_client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Transport(format!("request timed out after {}s", self.timeout.as_secs()))
                } else {
                    BackendError::transport(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(BackendError::transport)?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "generation backend returned an error");
            return Err(status_error(status.as_u16(), &body));
        }

        parse_response(&body)
    }
}

fn endpoint_url(endpoint: &str, model: &str) -> String {
    format!("{}/models/{}:generateContent", endpoint.trim_end_matches('/'), model)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Text of the first candidate, all parts concatenated
fn parse_response(body: &str) -> Result<String, BackendError> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(BackendError::invalid_response)?;

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
            .map_or_else(|| "no candidates returned".to_string(), |reason| format!("prompt blocked: {reason}"));
        return Err(BackendError::InvalidResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
        return Err(BackendError::InvalidResponse(format!(
            "candidate contained no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

fn status_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == 429 {
        BackendError::QuotaExceeded(message)
    } else {
        BackendError::Status { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::new("make it red")).unwrap();
        assert_eq!(
            body,
            json!({"contents": [{"role": "user", "parts": [{"text": "make it red"}]}]})
        );
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        assert_eq!(
            endpoint_url("https://example.test/v1beta/", "gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn parts_are_concatenated() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"label\": "}, {"text": "\"Go\"}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        })
        .to_string();
        assert_eq!(parse_response(&body).unwrap(), "{\"label\": \"Go\"}");
    }

    #[test]
    fn blocked_prompt_is_invalid_response() {
        let body = json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string();
        assert_eq!(
            parse_response(&body).unwrap_err(),
            BackendError::InvalidResponse("prompt blocked: SAFETY".into())
        );
    }

    #[test]
    fn empty_candidate_reports_finish_reason() {
        let body = json!({"candidates": [{"finishReason": "MAX_TOKENS"}]}).to_string();
        assert_eq!(
            parse_response(&body).unwrap_err(),
            BackendError::InvalidResponse("candidate contained no text (finish reason: MAX_TOKENS)".into())
        );
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>").unwrap_err(),
            BackendError::InvalidResponse(_)
        ));
    }

    #[test]
    fn status_errors_are_classified() {
        let quota = json!({"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}});
        assert_eq!(
            status_error(429, &quota.to_string()),
            BackendError::QuotaExceeded("Resource exhausted".into())
        );
        assert_eq!(
            status_error(502, "bad gateway\n"),
            BackendError::Status { status: 502, message: "bad gateway".into() }
        );
    }

    #[test]
    fn missing_key_is_fatal() {
        let config = BackendConfig::default().with_api_key_env("UIGEN_TEST_KEY");
        let err = GeminiBackend::from_lookup(&config, |_| Some("   ".into())).unwrap_err();
        assert_eq!(err, BackendError::MissingCredentials("UIGEN_TEST_KEY".into()));
    }

    #[test]
    fn key_from_lookup() {
        let config = BackendConfig::default().with_endpoint("http://localhost:9/v1beta");
        let backend = GeminiBackend::from_lookup(&config, |name| {
            (name == "GEMINI_API_KEY").then(|| "secret".to_string())
        })
        .unwrap();
        assert_eq!(backend.url(), "http://localhost:9/v1beta/models/gemini-1.5-flash:generateContent");
        assert!(!format!("{backend:?}").contains("secret"));
    }

    #[test]
    fn model_selects_url() {
        let config = BackendConfig::default()
            .with_endpoint("http://localhost:9/v1beta")
            .with_model("gemini-2.0-flash");
        let backend = GeminiBackend::with_api_key(&config, "key").unwrap();
        assert_eq!(backend.model(), "gemini-2.0-flash");
        assert_eq!(backend.url(), "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let config = BackendConfig::default().with_endpoint("http://127.0.0.1:9/v1beta");
        let backend = GeminiBackend::with_api_key(&config, "key").unwrap();
        assert!(matches!(
            backend.generate("hello").await.unwrap_err(),
            BackendError::Transport(_)
        ));
    }
}
