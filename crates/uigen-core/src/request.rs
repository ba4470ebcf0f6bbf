//! Request and result types
//!
//! A request names exactly what is being generated. Config requests cannot
//! carry providers and playground requests cannot carry a config kind, so
//! the orchestrator never has to reject such mixtures at runtime.

use crate::error::{AttemptError, GenerationError};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use uigen_schema::{schema_for, ArtifactKind, Provider};
use uigen_validate::{json_type, COMPONENT_SOURCE_KEY};

/// One generation request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    /// Update a structured component configuration
    Config {
        /// Config kind (never a code kind)
        kind: ArtifactKind,
        /// Natural-language change request
        intent: String,
        /// Current configuration object
        current: Value,
    },
    /// Rewrite a single component's source
    Component {
        /// Natural-language change request
        intent: String,
        /// Current source, empty for a fresh component
        current_source: String,
    },
    /// Generate the same UI once per component library
    Playground {
        /// Natural-language change request
        intent: String,
        /// Current source per provider, possibly partial
        current: IndexMap<Provider, String>,
        /// Target providers, in request order, without duplicates
        providers: Vec<Provider>,
    },
}

impl GenerationRequest {
    /// Build a config request from a kind tag
    ///
    /// A `null` current state is treated as an empty object.
    ///
    /// # Errors
    /// `UnsupportedArtifactKind` for unknown tags and code kinds,
    /// `InvalidRequest` for an empty intent or non-object state.
    pub fn config(kind: &str, intent: impl Into<String>, current: Value) -> Result<Self, GenerationError> {
        let kind: ArtifactKind = kind.parse()?;
        schema_for(kind)?;
        let intent = non_empty_intent(intent.into())?;

        let current = match current {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => current,
            other => {
                return Err(GenerationError::invalid_request(format!(
                    "current state must be a JSON object, got {}",
                    json_type(&other)
                )))
            }
        };

        Ok(Self::Config { kind, intent, current })
    }

    /// Build a single-component code request
    ///
    /// # Errors
    /// `InvalidRequest` for an empty intent.
    pub fn component(intent: impl Into<String>, current_source: impl Into<String>) -> Result<Self, GenerationError> {
        Ok(Self::Component {
            intent: non_empty_intent(intent.into())?,
            current_source: current_source.into(),
        })
    }

    /// Build a playground request from provider ids
    ///
    /// `current` is an object keyed by provider id with source strings;
    /// `null` means no current sources. Duplicate provider ids are collapsed
    /// keeping the first occurrence.
    ///
    /// # Errors
    /// `UnsupportedProvider` for unknown ids (in `providers` or as keys of
    /// `current`), `InvalidRequest` for an empty intent, an empty provider
    /// list, or a malformed `current`.
    pub fn playground(intent: impl Into<String>, current: &Value, providers: &[&str]) -> Result<Self, GenerationError> {
        let mut parsed: Vec<Provider> = Vec::with_capacity(providers.len());
        for id in providers {
            let provider: Provider = id.parse()?;
            if !parsed.contains(&provider) {
                parsed.push(provider);
            }
        }
        if parsed.is_empty() {
            return Err(GenerationError::invalid_request("at least one provider is required"));
        }

        let mut sources = IndexMap::new();
        match current {
            Value::Null => {}
            Value::Object(map) => {
                for (id, source) in map {
                    let provider: Provider = id.parse()?;
                    let Value::String(source) = source else {
                        return Err(GenerationError::invalid_request(format!(
                            "current source for {provider} must be a string"
                        )));
                    };
                    sources.insert(provider, source.clone());
                }
            }
            other => {
                return Err(GenerationError::invalid_request(format!(
                    "current sources must be a JSON object keyed by provider, got {}",
                    json_type(other)
                )))
            }
        }

        Ok(Self::Playground {
            intent: non_empty_intent(intent.into())?,
            current: sources,
            providers: parsed,
        })
    }

    /// Artifact kind of the request
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Config { kind, .. } => *kind,
            Self::Component { .. } => ArtifactKind::Component,
            Self::Playground { .. } => ArtifactKind::Playground,
        }
    }

    /// Natural-language intent
    #[must_use]
    pub fn intent(&self) -> &str {
        match self {
            Self::Config { intent, .. } | Self::Component { intent, .. } | Self::Playground { intent, .. } => intent,
        }
    }
}

/// Terminal outcome of a request
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    /// A value that passed validation
    ///
    /// Config: the merged configuration. Component: `{"code": source}`.
    /// Playground: an object keyed by provider id.
    Success {
        /// Validated value
        value: Value,
        /// Attempts made, including the successful one
        attempts_used: u32,
    },
    /// Ceiling reached without an accepted attempt
    Exhausted {
        /// Failure of the final attempt
        last_error: AttemptError,
        /// Attempts made, equal to the ceiling
        attempts_used: u32,
    },
}

impl GenerationResult {
    /// Whether the request succeeded
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Attempts made
    #[inline]
    #[must_use]
    pub fn attempts_used(&self) -> u32 {
        match self {
            Self::Success { attempts_used, .. } | Self::Exhausted { attempts_used, .. } => *attempts_used,
        }
    }

    /// Validated value, if any
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success { value, .. } => Some(value),
            Self::Exhausted { .. } => None,
        }
    }

    /// Source of a successful component request
    #[must_use]
    pub fn component_source(&self) -> Option<&str> {
        self.value()?.get(COMPONENT_SOURCE_KEY)?.as_str()
    }
}

/// One loop iteration, kept for the caller's report
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationAttempt {
    /// 1-based attempt index
    pub index: u32,
    /// Prompt sent to the backend
    pub prompt: String,
    /// Backend text, absent when the backend call failed
    pub raw_response: Option<String>,
    /// Why the attempt failed, absent when it was accepted
    pub error: Option<AttemptError>,
}

impl GenerationAttempt {
    /// Whether this attempt was accepted
    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }
}

/// Result plus every attempt that led to it
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Terminal outcome
    pub result: GenerationResult,
    /// Attempts in order
    pub attempts: Vec<GenerationAttempt>,
}

fn non_empty_intent(intent: String) -> Result<String, GenerationError> {
    let trimmed = intent.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::invalid_request("intent must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn config_request_parses_kind() {
        let request = GenerationRequest::config("Icon-Button", "add a star", json!({})).unwrap();
        assert_eq!(request.kind(), ArtifactKind::IconButton);
        assert_eq!(request.intent(), "add a star");
    }

    #[test]
    fn unknown_kind_is_fatal() {
        assert_eq!(
            GenerationRequest::config("slider", "x", json!({})).unwrap_err(),
            GenerationError::UnsupportedArtifactKind("slider".into())
        );
    }

    #[test]
    fn code_kind_is_not_a_config_kind() {
        assert_eq!(
            GenerationRequest::config("playground", "x", json!({})).unwrap_err(),
            GenerationError::UnsupportedArtifactKind("playground".into())
        );
    }

    #[test]
    fn null_state_becomes_empty_object() {
        let GenerationRequest::Config { current, .. } =
            GenerationRequest::config("button", "make it red", Value::Null).unwrap()
        else {
            panic!("expected config request");
        };
        assert_eq!(current, json!({}));
    }

    #[test]
    fn non_object_state_is_rejected() {
        assert_eq!(
            GenerationRequest::config("button", "x", json!([1])).unwrap_err(),
            GenerationError::invalid_request("current state must be a JSON object, got array")
        );
        assert_eq!(
            GenerationRequest::playground("x", &json!("<Button />"), &["mui"]).unwrap_err(),
            GenerationError::invalid_request("current sources must be a JSON object keyed by provider, got string")
        );
    }

    #[test]
    fn blank_intent_is_rejected() {
        assert!(matches!(
            GenerationRequest::component("   ", "").unwrap_err(),
            GenerationError::InvalidRequest(_)
        ));
    }

    #[test]
    fn playground_providers_keep_order_and_dedupe() {
        let request = GenerationRequest::playground(
            "a login form",
            &json!({"chakra": "export default 1;"}),
            &["chakra", "mui", "chakra"],
        )
        .unwrap();
        let GenerationRequest::Playground { providers, current, .. } = request else {
            panic!("expected playground request");
        };
        assert_eq!(providers, vec![Provider::Chakra, Provider::Mui]);
        assert_eq!(current[&Provider::Chakra], "export default 1;");
    }

    #[test]
    fn playground_rejects_unknown_and_empty_providers() {
        assert_eq!(
            GenerationRequest::playground("x", &Value::Null, &["bootstrap"]).unwrap_err(),
            GenerationError::UnsupportedProvider("bootstrap".into())
        );
        assert!(matches!(
            GenerationRequest::playground("x", &Value::Null, &[]).unwrap_err(),
            GenerationError::InvalidRequest(_)
        ));
    }

    #[test]
    fn result_accessors() {
        let result = GenerationResult::Success {
            value: json!({"code": "export default 1;"}),
            attempts_used: 2,
        };
        assert!(result.is_success());
        assert_eq!(result.attempts_used(), 2);
        assert_eq!(result.component_source(), Some("export default 1;"));
    }
}
