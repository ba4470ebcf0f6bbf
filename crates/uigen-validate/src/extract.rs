//! Response extraction
//!
//! Generators wrap JSON in prose or markdown fences despite being told not
//! to. Extraction is deliberately permissive; validators are the real gate.

use crate::error::ExtractError;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use uigen_schema::Provider;

/// Key holding the source in single-component responses
pub const COMPONENT_SOURCE_KEY: &str = "code";

/// Locate and parse the JSON object in a raw response
///
/// Tries the slice from the first `{` to the last `}` first, then falls
/// back to the whole response with code-fence lines removed.
///
/// # Errors
/// `ExtractError` when nothing parses or the parsed value is not an object.
pub fn extract(raw: &str) -> Result<Value, ExtractError> {
    if raw.trim().is_empty() {
        return Err(ExtractError::Empty);
    }

    let mut first_error = None;
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            match serde_json::from_str::<Value>(&raw[start..=end]) {
                Ok(value) => return into_object(value),
                Err(e) => first_error = Some(ExtractError::invalid_json(e)),
            }
        }
    }

    let stripped = strip_code_fences(raw);
    match serde_json::from_str::<Value>(stripped.trim()) {
        Ok(value) => into_object(value),
        Err(e) => Err(first_error.unwrap_or_else(|| ExtractError::invalid_json(e))),
    }
}

/// Extract one source string per requested provider
///
/// The response must be a single object keyed by provider id. Keys for
/// providers that were not requested are ignored.
///
/// # Errors
/// `ExtractError` when extraction fails or a requested provider is missing
/// or not a string.
pub fn extract_provider_sources(
    raw: &str,
    providers: &[Provider],
) -> Result<IndexMap<Provider, String>, ExtractError> {
    let value = extract(raw)?;
    let object = value.as_object().ok_or(ExtractError::NotAnObject("non-object"))?;

    providers
        .iter()
        .map(|provider| source_at(object, provider.id()).map(|source| (*provider, source)))
        .collect()
}

/// Extract the source of a single-component response (`{"code": "..."}`)
///
/// # Errors
/// `ExtractError` when extraction fails or `code` is missing or not a
/// string.
pub fn extract_component_source(raw: &str) -> Result<String, ExtractError> {
    let value = extract(raw)?;
    let object = value.as_object().ok_or(ExtractError::NotAnObject("non-object"))?;
    source_at(object, COMPONENT_SOURCE_KEY)
}

fn source_at(object: &Map<String, Value>, key: &str) -> Result<String, ExtractError> {
    match object.get(key) {
        Some(Value::String(source)) => Ok(source.clone()),
        Some(_) => Err(ExtractError::SourceNotString(key.to_string())),
        None => Err(ExtractError::MissingSource(key.to_string())),
    }
}

fn into_object(value: Value) -> Result<Value, ExtractError> {
    match value {
        Value::Object(_) => Ok(value),
        other => Err(ExtractError::NotAnObject(json_type(&other))),
    }
}

/// Remove markdown fence lines (```` ``` ````, ```` ```json ````)
fn strip_code_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON type name used in diagnostics
#[must_use]
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
