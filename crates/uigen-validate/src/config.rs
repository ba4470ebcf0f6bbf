//! Schema validators for config kinds
//!
//! A [`SchemaValidator`] walks a candidate against a [`ConfigSchema`] and
//! reports every violation in schema declaration order. Unknown keys are
//! dropped from the accepted value, so validating an accepted value again
//! yields the same value.

use crate::extract::json_type;
use crate::outcome::{FieldError, ValidationOutcome};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uigen_schema::{schema_for, ArtifactKind, ConfigSchema, CrossFieldRule, FieldSpec, FieldType, SchemaError};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color pattern"));

/// Validator for one artifact kind
pub trait Validator: Send + Sync {
    /// Kind this validator accepts
    fn kind(&self) -> ArtifactKind;

    /// Check a candidate; pure function of its input
    fn validate(&self, candidate: &Value) -> ValidationOutcome;
}

/// Validator driven by a registry schema
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    schema: &'static ConfigSchema,
}

impl SchemaValidator {
    /// Create validator for a schema
    #[inline]
    #[must_use]
    pub fn new(schema: &'static ConfigSchema) -> Self {
        Self { schema }
    }

    /// Create validator for a registry kind
    ///
    /// # Errors
    /// `SchemaError::UnsupportedArtifactKind` for kinds without a schema.
    #[inline]
    pub fn for_kind(kind: ArtifactKind) -> Result<Self, SchemaError> {
        schema_for(kind).map(Self::new)
    }
}

impl Validator for SchemaValidator {
    fn kind(&self) -> ArtifactKind {
        self.schema.kind()
    }

    fn validate(&self, candidate: &Value) -> ValidationOutcome {
        let Some(object) = candidate.as_object() else {
            return ValidationOutcome::rejected(
                "$",
                format!("expected a JSON object, got {}", json_type(candidate)),
            );
        };

        let mut errors = Vec::new();
        let normalized = check_fields(self.schema.fields(), object, "", &mut errors);
        for rule in self.schema.rules() {
            if rule.references().iter().any(|field| has_error(&errors, field)) {
                continue;
            }
            if let Some(error) = check_rule(rule, &normalized) {
                errors.push(error);
            }
        }

        if errors.is_empty() {
            ValidationOutcome::Accepted {
                value: Value::Object(normalized),
            }
        } else {
            tracing::debug!(kind = %self.schema.kind(), errors = errors.len(), "candidate rejected");
            ValidationOutcome::Rejected { errors }
        }
    }
}

/// Validators keyed by kind
pub struct ValidatorSet {
    validators: BTreeMap<ArtifactKind, Box<dyn Validator>>,
}

impl ValidatorSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            validators: BTreeMap::new(),
        }
    }

    /// Set with a schema validator for every registry config kind
    #[must_use]
    pub fn builtin() -> Self {
        let mut set = Self::new();
        for kind in uigen_schema::config_kinds() {
            if let Ok(validator) = SchemaValidator::for_kind(kind) {
                set.register(validator);
            }
        }
        set
    }

    /// Register (or replace) the validator for its kind
    pub fn register<V: Validator + 'static>(&mut self, validator: V) {
        self.validators.insert(validator.kind(), Box::new(validator));
    }

    /// Validator for a kind
    ///
    /// # Errors
    /// `SchemaError::UnsupportedArtifactKind` when none is registered.
    pub fn get(&self, kind: ArtifactKind) -> Result<&dyn Validator, SchemaError> {
        self.validators
            .get(&kind)
            .map(|v| &**v)
            .ok_or_else(|| SchemaError::UnsupportedArtifactKind(kind.tag().to_string()))
    }

    /// Registered kinds
    #[must_use]
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.validators.keys().copied().collect()
    }
}

impl Default for ValidatorSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorSet")
            .field("kinds", &self.kinds())
            .finish()
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn check_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    prefix: &str,
    errors: &mut Vec<FieldError>,
) -> Map<String, Value> {
    let mut normalized = Map::new();
    for field in fields {
        let path = join_path(prefix, field.name);
        match object.get(field.name) {
            Some(value) => {
                let value = check_value(&field.ty, value, &path, errors);
                normalized.insert(field.name.to_string(), value);
            }
            None if field.required => errors.push(FieldError::new(path, "is required")),
            None => {}
        }
    }
    normalized
}

fn check_value(ty: &FieldType, value: &Value, path: &str, errors: &mut Vec<FieldError>) -> Value {
    let mismatch = |errors: &mut Vec<FieldError>, expected: &str| {
        errors.push(FieldError::new(
            path,
            format!("expected {expected}, got {}", json_type(value)),
        ));
    };

    match ty {
        FieldType::String => {
            if !value.is_string() {
                mismatch(errors, "string");
            }
        }
        FieldType::NonEmptyString => match value.as_str() {
            Some(s) if s.trim().is_empty() => errors.push(FieldError::new(path, "must not be empty")),
            Some(_) => {}
            None => mismatch(errors, "string"),
        },
        FieldType::Boolean => {
            if !value.is_boolean() {
                mismatch(errors, "boolean");
            }
        }
        FieldType::Number { min, max } => match value.as_f64() {
            Some(n) => check_bounds(n, *min, *max, path, errors),
            None => mismatch(errors, "number"),
        },
        FieldType::Integer { min, max } => match value.as_i64() {
            Some(n) => check_bounds(n as f64, min.map(|v| v as f64), max.map(|v| v as f64), path, errors),
            None if value.is_number() => {
                errors.push(FieldError::new(path, format!("expected integer, got {value}")));
            }
            None => mismatch(errors, "integer"),
        },
        FieldType::Enum(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => {}
            Some(s) => {
                let quoted: Vec<String> = allowed.iter().map(|v| format!("\"{v}\"")).collect();
                errors.push(FieldError::new(
                    path,
                    format!("must be one of {}, got \"{s}\"", quoted.join(", ")),
                ));
            }
            None => mismatch(errors, "string"),
        },
        FieldType::Color => match value.as_str() {
            Some(s) if HEX_COLOR.is_match(s) => {}
            Some(s) => errors.push(FieldError::new(
                path,
                format!("must be a 6-digit hex color like \"#1A2B3C\", got \"{s}\""),
            )),
            None => mismatch(errors, "hex color string"),
        },
        FieldType::Object(fields) => match value.as_object() {
            Some(object) => return Value::Object(check_fields(fields, object, path, errors)),
            None => mismatch(errors, "object"),
        },
        FieldType::Array { items, min_len } => match value.as_array() {
            Some(array) => {
                if array.len() < *min_len {
                    errors.push(FieldError::new(
                        path,
                        format!(
                            "must contain at least {min_len} entr{}",
                            if *min_len == 1 { "y" } else { "ies" }
                        ),
                    ));
                }
                return Value::Array(
                    array
                        .iter()
                        .enumerate()
                        .map(|(i, item)| check_value(items, item, &format!("{path}[{i}]"), errors))
                        .collect(),
                );
            }
            None => mismatch(errors, "array"),
        },
        FieldType::OneOf(alternatives) => {
            for alternative in alternatives {
                let mut scratch = Vec::new();
                let normalized = check_value(alternative, value, path, &mut scratch);
                if scratch.is_empty() {
                    return normalized;
                }
            }
            mismatch(errors, &ty.describe());
        }
    }
    value.clone()
}

fn check_bounds(n: f64, min: Option<f64>, max: Option<f64>, path: &str, errors: &mut Vec<FieldError>) {
    let below = min.is_some_and(|min| n < min);
    let above = max.is_some_and(|max| n > max);
    if !(below || above) {
        return;
    }
    let message = match (min, max) {
        (Some(min), Some(max)) => format!("must be between {min} and {max}, got {n}"),
        (Some(min), None) => format!("must be at least {min}, got {n}"),
        (None, Some(max)) => format!("must be at most {max}, got {n}"),
        (None, None) => return,
    };
    errors.push(FieldError::new(path, message));
}

/// Whether `field` or anything below it already failed
fn has_error(errors: &[FieldError], field: &str) -> bool {
    errors.iter().any(|e| {
        e.path
            .strip_prefix(field)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.') || rest.starts_with('['))
    })
}

fn check_rule(rule: &CrossFieldRule, object: &Map<String, Value>) -> Option<FieldError> {
    match rule {
        CrossFieldRule::MemberOf { field, options, key } => {
            let value = object.get(*field)?.as_str()?;
            let entries = object.get(*options)?.as_array()?;
            let candidates: Vec<&str> = entries
                .iter()
                .filter_map(|entry| match key {
                    Some(key) => entry.get(*key).and_then(Value::as_str),
                    None => entry.as_str(),
                })
                .collect();
            if candidates.contains(&value) {
                return None;
            }
            let target = match key {
                Some(key) => format!("the {key} of one of the entries in {options}"),
                None => format!("one of the entries in {options}"),
            };
            Some(FieldError::new(*field, format!("must be {target}, got \"{value}\"")))
        }
        CrossFieldRule::AtMost { field, limit } => {
            let value = object.get(*field)?.as_f64()?;
            let limit_value = object.get(*limit)?.as_f64()?;
            (value > limit_value).then(|| {
                FieldError::new(*field, format!("must not exceed {limit} ({limit_value}), got {value}"))
            })
        }
        CrossFieldRule::IndexWithin { field, array } => {
            let index = object.get(*field)?.as_u64()?;
            let len = object.get(*array)?.as_array()?.len() as u64;
            (index >= len).then(|| {
                FieldError::new(
                    *field,
                    format!("must be less than the number of {array} ({len}), got {index}"),
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validate(kind: ArtifactKind, candidate: Value) -> ValidationOutcome {
        SchemaValidator::for_kind(kind).unwrap().validate(&candidate)
    }

    fn paths(outcome: &ValidationOutcome) -> Vec<&str> {
        outcome.errors().iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn non_object_is_rejected_not_panicking() {
        let outcome = validate(ArtifactKind::Button, json!(["label"]));
        assert_eq!(
            outcome,
            ValidationOutcome::rejected("$", "expected a JSON object, got array")
        );
    }

    #[test]
    fn every_violation_is_reported_in_schema_order() {
        let outcome = validate(
            ArtifactKind::Button,
            json!({
                "styles": {"backgroundColor": "blue", "borderRadius": 150},
                "variant": "huge"
            }),
        );
        assert_eq!(
            paths(&outcome),
            vec!["label", "variant", "styles.backgroundColor", "styles.borderRadius"]
        );
        assert_eq!(
            outcome.errors()[3].message,
            "must be between 0 and 100, got 150"
        );
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let outcome = validate(
            ArtifactKind::Progress,
            json!({"value": 1, "max": 2, "animated": true}),
        );
        assert_eq!(
            outcome,
            ValidationOutcome::Accepted {
                value: json!({"value": 1, "max": 2})
            }
        );
    }

    #[test]
    fn select_value_must_be_an_option() {
        let outcome = validate(
            ArtifactKind::Select,
            json!({"options": ["a", "b"], "value": "c"}),
        );
        assert_eq!(
            outcome,
            ValidationOutcome::rejected("value", "must be one of the entries in options, got \"c\"")
        );
    }

    #[test]
    fn cross_rule_skipped_when_field_already_failed() {
        let outcome = validate(ArtifactKind::Select, json!({"options": [], "value": "c"}));
        assert_eq!(paths(&outcome), vec!["options"]);
    }

    #[test]
    fn tabs_active_tab_by_label() {
        let ok = validate(
            ArtifactKind::Tabs,
            json!({"tabs": [{"label": "A", "content": ""}], "activeTab": "A"}),
        );
        assert!(ok.is_accepted());

        let bad = validate(
            ArtifactKind::Tabs,
            json!({"tabs": [{"label": "A", "content": ""}, {"content": 3}], "activeTab": "B"}),
        );
        assert_eq!(
            paths(&bad),
            vec!["tabs[1].label", "tabs[1].content"]
        );
    }

    #[test]
    fn progress_value_at_most_max() {
        let outcome = validate(ArtifactKind::Progress, json!({"value": 120, "max": 100}));
        assert_eq!(
            outcome,
            ValidationOutcome::rejected("value", "must not exceed max (100), got 120")
        );
    }

    #[test]
    fn accordion_index_within_items() {
        let outcome = validate(
            ArtifactKind::Accordion,
            json!({"items": [{"title": "A", "content": "a"}], "expandedIndex": 1}),
        );
        assert_eq!(paths(&outcome), vec!["expandedIndex"]);

        let fractional = validate(
            ArtifactKind::Accordion,
            json!({"items": [{"title": "A", "content": "a"}], "expandedIndex": 0.5}),
        );
        assert_eq!(fractional.errors()[0].message, "expected integer, got 0.5");
    }

    #[test]
    fn card_image_union() {
        let base = json!({"title": "T"});
        for image in [json!(true), json!("https://example.com/a.png")] {
            let mut candidate = base.clone();
            candidate["image"] = image;
            assert!(validate(ArtifactKind::Card, candidate).is_accepted());
        }
        let outcome = validate(ArtifactKind::Card, json!({"title": "T", "image": 3}));
        assert_eq!(
            outcome.errors()[0].message,
            "expected boolean or non-empty string, got number"
        );
    }

    #[test]
    fn color_cases() {
        for bad in ["#ZZZZZZ", "#fff", "red", "1A2B3C", "#1A2B3C4"] {
            let outcome = validate(
                ArtifactKind::Progress,
                json!({"value": 1, "max": 2, "styles": {"indicatorColor": bad}}),
            );
            assert_eq!(paths(&outcome), vec!["styles.indicatorColor"], "{bad}");
        }
        for good in ["#1A2B3C", "#abcdef"] {
            let outcome = validate(
                ArtifactKind::Progress,
                json!({"value": 1, "max": 2, "styles": {"indicatorColor": good}}),
            );
            assert!(outcome.is_accepted(), "{good}");
        }
    }

    #[test]
    fn builtin_set_covers_config_kinds() {
        let set = ValidatorSet::builtin();
        assert_eq!(set.kinds().len(), 10);
        assert!(set.get(ArtifactKind::Button).is_ok());
        assert_eq!(
            set.get(ArtifactKind::Playground).err(),
            Some(SchemaError::UnsupportedArtifactKind("playground".to_string()))
        );
    }
}
