//! Testing utilities for the uigen workspace
//!
//! Stub backends and fixtures shared by the integration suites.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use uigen_core::{BackendError, GenerationBackend, GenerationConfig, InMemoryHistory, Orchestrator};

/// Backend that replays queued responses and records every prompt
///
/// Once the queue is drained the last response is repeated.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, BackendError>>>,
    last: Mutex<Option<Result<String, BackendError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that always answers `text`
    pub fn always(text: impl Into<String>) -> Self {
        Self::new().then_ok(text)
    }

    /// Queue a successful response
    #[must_use]
    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue a backend failure
    #[must_use]
    pub fn then_err(self, err: BackendError) -> Self {
        self.responses.lock().push_back(Err(err));
        self
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    /// Number of backend calls so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().push(prompt.to_string());

        let next = self.responses.lock().pop_front();
        let mut last = self.last.lock();
        match next {
            Some(response) => {
                *last = Some(response.clone());
                response
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(BackendError::InvalidResponse("script exhausted".to_string()))),
        }
    }
}

/// Backend that fails every call with the same error
#[derive(Debug, Clone)]
pub struct FailingBackend {
    error: BackendError,
}

impl FailingBackend {
    pub fn new(error: BackendError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate(&self, _prompt: &str) -> Result<String, BackendError> {
        Err(self.error.clone())
    }
}

/// Orchestrator over a shared scripted backend with an in-memory history
pub fn setup_orchestrator(backend: Arc<ScriptedBackend>, max_attempts: u32) -> (Orchestrator, Arc<InMemoryHistory>) {
    let history = Arc::new(InMemoryHistory::new());
    let orchestrator = Orchestrator::new(backend)
        .with_config(GenerationConfig::new().with_max_attempts(max_attempts))
        .with_history(history.clone());
    (orchestrator, history)
}

/// Current state of a progress bar at 10%
pub fn progress_state() -> Value {
    json!({"value": 10, "max": 100, "variant": "linear"})
}

/// Current state of a select with two options
pub fn select_state() -> Value {
    json!({"label": "Fruit", "options": ["a", "b"], "value": "a"})
}

/// Minimal valid Material UI module
pub fn mui_source() -> String {
    [
        "import { Button, Stack } from '@mui/material';",
        "",
        "export default function LoginActions() {",
        "  return (",
        "    <Stack direction=\"row\" spacing={2}>",
        "      <Button variant=\"contained\">Sign in</Button>",
        "    </Stack>",
        "  );",
        "}",
    ]
    .join("\n")
}

/// Minimal valid Chakra UI module
pub fn chakra_source() -> String {
    [
        "import { Button, HStack } from '@chakra-ui/react';",
        "",
        "export default function LoginActions() {",
        "  return (",
        "    <HStack spacing={2}>",
        "      <Button colorScheme=\"blue\">Sign in</Button>",
        "    </HStack>",
        "  );",
        "}",
    ]
    .join("\n")
}

/// Playground response object for the given `(provider id, source)` pairs
pub fn playground_response(sources: &[(&str, &str)]) -> String {
    let object: serde_json::Map<String, Value> = sources
        .iter()
        .map(|(id, source)| ((*id).to_string(), Value::String((*source).to_string())))
        .collect();
    Value::Object(object).to_string()
}
