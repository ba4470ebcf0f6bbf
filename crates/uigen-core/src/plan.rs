//! Per-kind attempt strategies
//!
//! The orchestrator runs one loop for every kind; a plan supplies the parts
//! that differ: how to prompt, how to judge a response, and what to record.

use crate::error::AttemptError;
use crate::history::HistoryRecord;
use crate::prompt;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use uigen_schema::{ArtifactKind, ConfigSchema, Provider};
use uigen_validate::{
    extract, extract_component_source, extract_provider_sources, merge_patch, ExtractError, FieldError,
    SyntaxValidator, ValidationOutcome, Validator, COMPONENT_SOURCE_KEY,
};

pub(crate) trait AttemptPlan: Send + Sync {
    /// Prompt for the next attempt
    fn prompt(&self, prior_errors: &[String]) -> String;

    /// Turn raw backend text into an accepted value
    fn evaluate(&self, raw: &str) -> Result<Value, AttemptError>;

    /// Independent check of a value about to be returned
    fn recheck(&self, value: &Value) -> Result<(), AttemptError>;

    /// Audit record for an accepted value, if this kind is recorded
    fn history_record(&self, _value: &Value, _attempts_used: u32) -> Option<HistoryRecord> {
        None
    }
}

pub(crate) struct ConfigPlan<'a> {
    pub(crate) kind: ArtifactKind,
    pub(crate) schema: &'static ConfigSchema,
    pub(crate) validator: &'a dyn Validator,
    pub(crate) intent: &'a str,
    pub(crate) current: &'a Value,
}

impl AttemptPlan for ConfigPlan<'_> {
    fn prompt(&self, prior_errors: &[String]) -> String {
        prompt::config_prompt(self.schema, self.current, self.intent, prior_errors)
    }

    fn evaluate(&self, raw: &str) -> Result<Value, AttemptError> {
        let candidate = extract(raw)?;
        let merged = merge_patch(self.current, &candidate);
        self.validator
            .validate(&merged)
            .into_result()
            .map_err(AttemptError::SchemaViolation)
    }

    fn recheck(&self, value: &Value) -> Result<(), AttemptError> {
        self.validator
            .validate(value)
            .into_result()
            .map(drop)
            .map_err(AttemptError::SchemaViolation)
    }

    fn history_record(&self, value: &Value, attempts_used: u32) -> Option<HistoryRecord> {
        Some(HistoryRecord::new(
            self.kind,
            self.intent,
            self.current.clone(),
            value.clone(),
            attempts_used,
        ))
    }
}

pub(crate) struct ComponentPlan<'a> {
    pub(crate) syntax: SyntaxValidator,
    pub(crate) intent: &'a str,
    pub(crate) current_source: &'a str,
}

impl AttemptPlan for ComponentPlan<'_> {
    fn prompt(&self, prior_errors: &[String]) -> String {
        prompt::build_component_prompt(self.current_source, self.intent, prior_errors)
    }

    fn evaluate(&self, raw: &str) -> Result<Value, AttemptError> {
        let source = extract_component_source(raw)?;
        compiled(self.syntax.check_compiles(&source))?;

        let mut object = Map::new();
        object.insert(COMPONENT_SOURCE_KEY.to_string(), Value::String(source));
        Ok(Value::Object(object))
    }

    fn recheck(&self, value: &Value) -> Result<(), AttemptError> {
        let source = value
            .get(COMPONENT_SOURCE_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ExtractError::MissingSource(COMPONENT_SOURCE_KEY.to_string()))?;
        compiled(self.syntax.check_compiles(source))
    }
}

pub(crate) struct PlaygroundPlan<'a> {
    pub(crate) syntax: SyntaxValidator,
    pub(crate) intent: &'a str,
    pub(crate) current: &'a IndexMap<Provider, String>,
    pub(crate) providers: &'a [Provider],
}

impl PlaygroundPlan<'_> {
    /// Check every provider; all failures are collected so feedback names
    /// each failing provider
    fn check_all<'s>(&self, sources: impl IntoIterator<Item = (Provider, &'s str)>) -> Result<(), AttemptError> {
        let errors: Vec<FieldError> = sources
            .into_iter()
            .flat_map(|(provider, source)| {
                let outcome = self.syntax.check_provider(provider, source);
                if !outcome.is_accepted() {
                    tracing::debug!(%provider, "provider source rejected");
                }
                outcome.errors().to_vec()
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AttemptError::Compilation(errors))
        }
    }
}

impl AttemptPlan for PlaygroundPlan<'_> {
    fn prompt(&self, prior_errors: &[String]) -> String {
        prompt::build_playground_prompt(self.providers, self.current, self.intent, prior_errors)
    }

    fn evaluate(&self, raw: &str) -> Result<Value, AttemptError> {
        let sources = extract_provider_sources(raw, self.providers)?;
        self.check_all(sources.iter().map(|(provider, source)| (*provider, source.as_str())))?;

        Ok(Value::Object(
            sources
                .into_iter()
                .map(|(provider, source)| (provider.id().to_string(), Value::String(source)))
                .collect(),
        ))
    }

    fn recheck(&self, value: &Value) -> Result<(), AttemptError> {
        let mut sources = Vec::with_capacity(self.providers.len());
        for provider in self.providers {
            let source = value
                .get(provider.id())
                .and_then(Value::as_str)
                .ok_or_else(|| ExtractError::MissingSource(provider.id().to_string()))?;
            sources.push((*provider, source));
        }
        self.check_all(sources)
    }
}

fn compiled(outcome: ValidationOutcome) -> Result<(), AttemptError> {
    outcome.into_result().map(drop).map_err(AttemptError::Compilation)
}
