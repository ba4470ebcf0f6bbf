//! Generation orchestrator
//!
//! One bounded retry loop serves every artifact kind:
//!
//! ```text
//! Building → Calling → Extracting → Validating → Accepted
//!     ↑                                       ↓
//!     └────────── Retrying (feedback) ←───────┴→ Exhausted
//! ```
//!
//! Backend, extraction and validation failures never abort the loop; they
//! become the prior-error block of the next prompt.

use crate::backend::GenerationBackend;
use crate::config::GenerationConfig;
use crate::error::{AttemptError, GenerationError};
use crate::history::{HistoryRecord, PromptHistory};
use crate::plan::{AttemptPlan, ComponentPlan, ConfigPlan, PlaygroundPlan};
use crate::request::{GenerationAttempt, GenerationReport, GenerationRequest, GenerationResult};
use serde_json::Value;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::Instrument;
use uigen_schema::schema_for;
use uigen_validate::{SyntaxValidator, ValidatorSet};
use uuid::Uuid;

/// Runs generation requests against a backend
///
/// Holds no per-request state beyond queued history writes; share it behind
/// an `Arc` to serve concurrent requests.
pub struct Orchestrator {
    backend: Arc<dyn GenerationBackend>,
    validators: ValidatorSet,
    syntax: SyntaxValidator,
    config: GenerationConfig,
    history: Option<Arc<dyn PromptHistory>>,
    pending: Mutex<JoinSet<()>>,
}

impl Orchestrator {
    /// Create orchestrator with built-in validators and default settings
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            validators: ValidatorSet::builtin(),
            syntax: SyntaxValidator::new(),
            config: GenerationConfig::default(),
            history: None,
            pending: Mutex::new(JoinSet::new()),
        }
    }

    /// With retry settings
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// With a custom validator set
    #[inline]
    #[must_use]
    pub fn with_validators(mut self, validators: ValidatorSet) -> Self {
        self.validators = validators;
        self
    }

    /// With a history store for successful config generations
    #[inline]
    #[must_use]
    pub fn with_history(mut self, history: Arc<dyn PromptHistory>) -> Self {
        self.history = Some(history);
        self
    }

    /// Retry settings
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Wait for every history write started so far
    ///
    /// Generation never waits on history; call this before the runtime shuts
    /// down so queued records reach the store.
    pub async fn flush_history(&self) {
        let mut pending = std::mem::take(&mut *self.pending.lock());
        while let Some(joined) = pending.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "history task failed");
            }
        }
    }

    /// Generate an updated config for `kind`
    ///
    /// # Errors
    /// `GenerationError` for unknown or code kinds, a blank intent or a
    /// non-object state. No backend call is made in that case.
    pub async fn generate_config(
        &self,
        kind: &str,
        intent: &str,
        current: &Value,
    ) -> Result<GenerationResult, GenerationError> {
        let request = GenerationRequest::config(kind, intent, current.clone())?;
        self.run(&request).await
    }

    /// Generate one source per provider
    ///
    /// `current` is an object of provider id to source, or `null`.
    ///
    /// # Errors
    /// `GenerationError` for unknown providers, an empty provider list or a
    /// blank intent.
    pub async fn generate_code(
        &self,
        intent: &str,
        current: &Value,
        providers: &[&str],
    ) -> Result<GenerationResult, GenerationError> {
        let request = GenerationRequest::playground(intent, current, providers)?;
        self.run(&request).await
    }

    /// Rewrite a single component
    ///
    /// # Errors
    /// `InvalidRequest` for a blank intent.
    pub async fn generate_component(
        &self,
        intent: &str,
        current_source: &str,
    ) -> Result<GenerationResult, GenerationError> {
        let request = GenerationRequest::component(intent, current_source)?;
        self.run(&request).await
    }

    /// Run a prepared request
    ///
    /// # Errors
    /// `UnsupportedArtifactKind` when no validator is registered for the
    /// request's kind.
    pub async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        self.run_detailed(request).await.map(|report| report.result)
    }

    /// Run a prepared request and keep every attempt
    ///
    /// # Errors
    /// Same as [`Self::run`].
    pub async fn run_detailed(&self, request: &GenerationRequest) -> Result<GenerationReport, GenerationError> {
        let plan = self.plan(request)?;
        let span = tracing::info_span!(
            "generation",
            request_id = %Uuid::new_v4(),
            kind = %request.kind(),
        );

        let report = async {
            tracing::info!(intent = request.intent(), "generation started");
            let report = self.drive(plan.as_ref()).await;

            if let GenerationResult::Success { value, attempts_used } = &report.result {
                if let Some(record) = plan.history_record(value, *attempts_used) {
                    self.persist(record);
                }
            }
            report
        }
        .instrument(span)
        .await;
        Ok(report)
    }

    fn plan<'a>(&'a self, request: &'a GenerationRequest) -> Result<Box<dyn AttemptPlan + 'a>, GenerationError> {
        let plan: Box<dyn AttemptPlan + 'a> = match request {
            GenerationRequest::Config { kind, intent, current } => Box::new(ConfigPlan {
                kind: *kind,
                schema: schema_for(*kind)?,
                validator: self.validators.get(*kind)?,
                intent,
                current,
            }),
            GenerationRequest::Component { intent, current_source } => Box::new(ComponentPlan {
                syntax: self.syntax,
                intent,
                current_source,
            }),
            GenerationRequest::Playground { intent, current, providers } => {
                if providers.is_empty() {
                    return Err(GenerationError::invalid_request("at least one provider is required"));
                }
                Box::new(PlaygroundPlan {
                    syntax: self.syntax,
                    intent,
                    current,
                    providers,
                })
            }
        };
        Ok(plan)
    }

    async fn drive(&self, plan: &dyn AttemptPlan) -> GenerationReport {
        let ceiling = self.config.max_attempts.max(1);
        let mut attempts = Vec::new();
        let mut feedback: Vec<String> = Vec::new();
        let mut index = 1;

        loop {
            let prompt = plan.prompt(&feedback);
            tracing::debug!(attempt = index, prompt_bytes = prompt.len(), "calling backend");

            let (raw_response, outcome) = match self.backend.generate(&prompt).await {
                Ok(raw) => {
                    tracing::debug!(attempt = index, response_bytes = raw.len(), "validating response");
                    let outcome = plan
                        .evaluate(&raw)
                        .and_then(|value| plan.recheck(&value).map(|()| value));
                    (Some(raw), outcome)
                }
                Err(err) => (None, Err(AttemptError::Backend(err))),
            };

            match outcome {
                Ok(value) => {
                    tracing::info!(attempts_used = index, "generation accepted");
                    attempts.push(GenerationAttempt {
                        index,
                        prompt,
                        raw_response,
                        error: None,
                    });
                    return GenerationReport {
                        result: GenerationResult::Success {
                            value,
                            attempts_used: index,
                        },
                        attempts,
                    };
                }
                Err(error) => {
                    feedback = error.feedback_lines();
                    attempts.push(GenerationAttempt {
                        index,
                        prompt,
                        raw_response,
                        error: Some(error.clone()),
                    });

                    if index >= ceiling {
                        tracing::info!(attempts_used = index, %error, "generation exhausted");
                        return GenerationReport {
                            result: GenerationResult::Exhausted {
                                last_error: error,
                                attempts_used: index,
                            },
                            attempts,
                        };
                    }
                    tracing::warn!(
                        attempt = index,
                        reason = error.label(),
                        transient = error.is_transient(),
                        %error,
                        "attempt rejected, retrying"
                    );
                    index += 1;
                }
            }
        }
    }

    /// Hand a record to the history store without waiting for it
    fn persist(&self, record: HistoryRecord) {
        let Some(history) = self.history.clone() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id = %record.id, "no runtime available, history record dropped");
            return;
        };

        let task = async move {
            let id = record.id;
            if let Err(e) = history.append(record).await {
                tracing::error!(%id, error = %e, "failed to persist history record");
            }
        }
        .in_current_span();

        let mut pending = self.pending.lock();
        while pending.try_join_next().is_some() {}
        pending.spawn_on(task, &handle);
    }
}

impl Drop for Orchestrator {
    fn drop(&mut self) {
        // Unflushed writes keep running on the runtime
        self.pending.get_mut().detach_all();
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("validators", &self.validators)
            .field("config", &self.config)
            .field("history", &self.history.is_some())
            .field("pending_history_writes", &self.pending.lock().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MockGenerationBackend};
    use crate::history::InMemoryHistory;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn orchestrator(backend: MockGenerationBackend) -> Orchestrator {
        Orchestrator::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn accepts_first_valid_response() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_| Ok(r##"{"label": "Save", "variant": "primary"}"##.to_string()));

        let result = orchestrator(backend)
            .generate_config("button", "a primary save button", &json!({}))
            .await
            .unwrap();

        assert_eq!(
            result,
            GenerationResult::Success {
                value: json!({"label": "Save", "variant": "primary"}),
                attempts_used: 1,
            }
        );
    }

    #[tokio::test]
    async fn ceiling_bounds_attempts() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(4)
            .returning(|_| Ok("I am not JSON".to_string()));

        let result = orchestrator(backend)
            .with_config(GenerationConfig::new().with_max_attempts(4))
            .generate_config("button", "anything", &json!({}))
            .await
            .unwrap();

        assert_eq!(result.attempts_used(), 4);
        assert!(matches!(
            result,
            GenerationResult::Exhausted {
                last_error: AttemptError::MalformedResponse(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn backend_failures_become_feedback() {
        let mut seq = Sequence::new();
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(BackendError::QuotaExceeded("retry later".into())));
        backend
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|prompt| prompt.contains("the generation request failed: quota exceeded: retry later"))
            .returning(|_| Ok(r#"{"title": "Hi", "body": "There"}"#.to_string()));

        let report = orchestrator(backend)
            .run_detailed(&GenerationRequest::config("modal", "greeting", json!({})).unwrap())
            .await
            .unwrap();

        assert_eq!(report.result.attempts_used(), 2);
        assert_eq!(report.attempts[0].raw_response, None);
        assert!(report.attempts[1].is_accepted());
    }

    #[tokio::test]
    async fn unknown_kind_never_calls_backend() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().times(0);

        let err = orchestrator(backend)
            .generate_config("slider", "x", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::UnsupportedArtifactKind("slider".into()));
    }

    #[tokio::test]
    async fn missing_validator_is_unsupported() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_generate().times(0);

        let err = orchestrator(backend)
            .with_validators(ValidatorSet::new())
            .generate_config("button", "x", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::UnsupportedArtifactKind("button".into()));
    }

    #[tokio::test]
    async fn component_mode_wraps_source() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_| Ok(r#"{"code": "export default () => <button>Hi</button>;"}"#.to_string()));

        let result = orchestrator(backend)
            .generate_component("a hello button", "")
            .await
            .unwrap();
        assert_eq!(
            result.component_source(),
            Some("export default () => <button>Hi</button>;")
        );
    }

    #[tokio::test]
    async fn history_records_config_success() {
        let history = Arc::new(InMemoryHistory::new());
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_| Ok(r#"{"value": 40}"#.to_string()));

        let orchestrator = orchestrator(backend).with_history(history.clone());
        orchestrator
            .generate_config("progress", "set to 40%", &json!({"value": 10, "max": 100}))
            .await
            .unwrap();

        orchestrator.flush_history().await;
        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].previous, json!({"value": 10, "max": 100}));
        assert_eq!(records[0].result, json!({"value": 40, "max": 100}));
        assert_eq!(records[0].attempts_used, 1);
    }

    #[tokio::test]
    async fn dropped_orchestrator_still_writes_history() {
        let history = Arc::new(InMemoryHistory::new());
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_| Ok(r#"{"value": 40}"#.to_string()));

        let orchestrator = orchestrator(backend).with_history(history.clone());
        orchestrator
            .generate_config("progress", "set to 40%", &json!({"value": 10, "max": 100}))
            .await
            .unwrap();
        drop(orchestrator);

        for _ in 0..100 {
            if !history.is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn flush_without_history_returns() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_| Ok(r#"{"value": 40, "max": 100}"#.to_string()));

        let orchestrator = orchestrator(backend);
        orchestrator
            .generate_config("progress", "set to 40%", &Value::Null)
            .await
            .unwrap();
        orchestrator.flush_history().await;
        assert!(format!("{orchestrator:?}").contains("pending_history_writes: 0"));
    }

    #[tokio::test]
    async fn futures_are_send() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_generate()
            .returning(|_| Ok(r#"{"value": 5, "max": 10}"#.to_string()));
        let orchestrator = Arc::new(orchestrator(backend));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move {
                    orchestrator
                        .generate_config("progress", "halfway", &Value::Null)
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_success());
        }
    }
}
