//! Declarative config schemas
//!
//! A schema is an ordered list of [`FieldSpec`]s plus a handful of
//! cross-field rules. Schemas are plain data: validators walk them, the
//! prompt builder renders them through [`ConfigSchema::describe`].

use crate::kind::ArtifactKind;
use serde_json::Value;
use std::fmt::Write as _;

/// Format every color field must follow
pub const COLOR_FORMAT: &str = "\"#\" followed by exactly six hex digits, e.g. \"#1A2B3C\"";

/// Primitive or composite type of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Any string
    String,
    /// String with at least one non-whitespace character
    NonEmptyString,
    /// `true` / `false`
    Boolean,
    /// Number with optional inclusive bounds
    Number { min: Option<f64>, max: Option<f64> },
    /// Whole number with optional inclusive bounds
    Integer { min: Option<i64>, max: Option<i64> },
    /// One of a closed set of string literals
    Enum(&'static [&'static str]),
    /// `#RRGGBB`, case-insensitive
    Color,
    /// Nested object with its own ordered fields
    Object(Vec<FieldSpec>),
    /// Array of items with a minimum length
    Array { items: Box<FieldType>, min_len: usize },
    /// Any one of the alternatives
    OneOf(Vec<FieldType>),
}

impl FieldType {
    /// Bounded number
    #[inline]
    #[must_use]
    pub fn number_range(min: f64, max: f64) -> Self {
        FieldType::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Number with a lower bound only
    #[inline]
    #[must_use]
    pub fn number_min(min: f64) -> Self {
        FieldType::Number {
            min: Some(min),
            max: None,
        }
    }

    /// Array with a minimum length
    #[inline]
    #[must_use]
    pub fn array_of(items: FieldType, min_len: usize) -> Self {
        FieldType::Array {
            items: Box::new(items),
            min_len,
        }
    }

    /// Short natural-language rendering used in prompts
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::NonEmptyString => "non-empty string".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Number { min, max } => format!("number{}", describe_bounds(*min, *max)),
            FieldType::Integer { min, max } => format!(
                "integer{}",
                describe_bounds(min.map(|v| v as f64), max.map(|v| v as f64))
            ),
            FieldType::Enum(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
                format!("one of {}", quoted.join(" | "))
            }
            FieldType::Color => format!("hex color, {COLOR_FORMAT}"),
            FieldType::Object(_) => "object".to_string(),
            FieldType::Array { items, min_len } => {
                let items = items.describe();
                if *min_len == 0 {
                    format!("array of {items}")
                } else {
                    format!("array of {items} with at least {min_len} entr{}", if *min_len == 1 { "y" } else { "ies" })
                }
            }
            FieldType::OneOf(alternatives) => alternatives
                .iter()
                .map(FieldType::describe)
                .collect::<Vec<_>>()
                .join(" or "),
        }
    }
}

fn describe_bounds(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!(" between {min} and {max}"),
        (Some(min), None) => format!(" >= {min}"),
        (None, Some(max)) => format!(" <= {max}"),
        (None, None) => String::new(),
    }
}

/// One named field in a schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// JSON key
    pub name: &'static str,
    /// Field type
    pub ty: FieldType,
    /// Whether the field must be present
    pub required: bool,
    /// What the field controls
    pub description: &'static str,
    /// Default documented to the generator when the field is absent
    pub default: Option<&'static str>,
}

impl FieldSpec {
    /// Required field
    #[inline]
    #[must_use]
    pub fn required(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            description,
            default: None,
        }
    }

    /// Optional field
    #[inline]
    #[must_use]
    pub fn optional(name: &'static str, ty: FieldType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            description,
            default: None,
        }
    }

    /// With a documented default
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    fn render(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let presence = if self.required { "required" } else { "optional" };
        let _ = write!(out, "{indent}- {} ({}, {presence}", self.name, self.ty.describe());
        if let Some(default) = self.default {
            let _ = write!(out, ", defaults to {default}");
        }
        let _ = writeln!(out, "): {}", self.description);

        let nested = match &self.ty {
            FieldType::Object(fields) => Some(fields),
            FieldType::Array { items, .. } => match items.as_ref() {
                FieldType::Object(fields) => Some(fields),
                _ => None,
            },
            _ => None,
        };
        if let Some(fields) = nested {
            for field in fields {
                field.render(out, depth + 1);
            }
        }
    }
}

/// Constraint spanning more than one top-level field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossFieldRule {
    /// `field` must equal an entry of the array `options`, or the `key`
    /// member of an entry when the array holds objects
    MemberOf {
        field: &'static str,
        options: &'static str,
        key: Option<&'static str>,
    },
    /// Number `field` must not exceed number `limit`
    AtMost {
        field: &'static str,
        limit: &'static str,
    },
    /// Integer `field` must be a valid index into the array `array`
    IndexWithin {
        field: &'static str,
        array: &'static str,
    },
}

impl CrossFieldRule {
    /// Field the rule reports against
    #[inline]
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            CrossFieldRule::MemberOf { field, .. }
            | CrossFieldRule::AtMost { field, .. }
            | CrossFieldRule::IndexWithin { field, .. } => *field,
        }
    }

    /// Both top-level fields the rule reads
    #[inline]
    #[must_use]
    pub fn references(&self) -> [&'static str; 2] {
        match self {
            CrossFieldRule::MemberOf { field, options, .. } => [*field, *options],
            CrossFieldRule::AtMost { field, limit } => [*field, *limit],
            CrossFieldRule::IndexWithin { field, array } => [*field, *array],
        }
    }

    /// Natural-language rendering used in prompts
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            CrossFieldRule::MemberOf {
                field,
                options,
                key: None,
            } => format!("{field} must equal one of the entries in {options}"),
            CrossFieldRule::MemberOf {
                field,
                options,
                key: Some(key),
            } => format!("{field} must equal the {key} of one of the entries in {options}"),
            CrossFieldRule::AtMost { field, limit } => format!("{field} must not exceed {limit}"),
            CrossFieldRule::IndexWithin { field, array } => {
                format!("{field} must be a valid zero-based index into {array}")
            }
        }
    }
}

/// Complete schema for one config kind
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSchema {
    kind: ArtifactKind,
    summary: &'static str,
    fields: Vec<FieldSpec>,
    rules: Vec<CrossFieldRule>,
    example: Value,
}

impl ConfigSchema {
    /// Create schema
    #[must_use]
    pub fn new(kind: ArtifactKind, summary: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            kind,
            summary,
            fields,
            rules: Vec::new(),
            example: Value::Object(serde_json::Map::new()),
        }
    }

    /// With a cross-field rule
    #[inline]
    #[must_use]
    pub fn with_rule(mut self, rule: CrossFieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// With a known-valid example value
    #[inline]
    #[must_use]
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = example;
        self
    }

    /// Kind this schema belongs to
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// One-line summary of the component
    #[inline]
    #[must_use]
    pub fn summary(&self) -> &'static str {
        self.summary
    }

    /// Top-level fields in declaration order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Cross-field rules
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    /// Look up a top-level field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the required top-level fields
    #[must_use]
    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    /// A value that satisfies this schema
    #[inline]
    #[must_use]
    pub fn example(&self) -> &Value {
        &self.example
    }

    /// Natural-language rendering embedded verbatim in prompts
    ///
    /// Output depends only on the schema, so it is byte-identical across
    /// calls.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} configuration: {}", self.kind.display_name(), self.summary);
        out.push_str("Fields:\n");
        for field in &self.fields {
            field.render(&mut out, 0);
        }
        if !self.rules.is_empty() {
            out.push_str("Constraints:\n");
            for rule in &self.rules {
                let _ = writeln!(out, "- {}", rule.describe());
            }
        }
        out.push_str("Omit a field to leave it unchanged. ");
        let _ = write!(out, "Every color must be {COLOR_FORMAT}.");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ConfigSchema {
        ConfigSchema::new(
            ArtifactKind::Select,
            "A dropdown.",
            vec![
                FieldSpec::required(
                    "options",
                    FieldType::array_of(FieldType::NonEmptyString, 1),
                    "Choices.",
                ),
                FieldSpec::optional("value", FieldType::String, "Selected choice."),
                FieldSpec::optional(
                    "styles",
                    FieldType::Object(vec![FieldSpec::optional(
                        "borderRadius",
                        FieldType::number_range(0.0, 100.0),
                        "Corner rounding.",
                    )]),
                    "Visual overrides.",
                ),
            ],
        )
        .with_rule(CrossFieldRule::MemberOf {
            field: "value",
            options: "options",
            key: None,
        })
    }

    #[test]
    fn describe_lists_fields_rules_and_omission() {
        let text = sample().describe();
        assert_eq!(
            text,
            "Select configuration: A dropdown.\n\
             Fields:\n\
             - options (array of non-empty string with at least 1 entry, required): Choices.\n\
             - value (string, optional): Selected choice.\n\
             - styles (object, optional): Visual overrides.\n\
             \x20\x20- borderRadius (number between 0 and 100, optional): Corner rounding.\n\
             Constraints:\n\
             - value must equal one of the entries in options\n\
             Omit a field to leave it unchanged. Every color must be \"#\" followed by exactly six hex digits, e.g. \"#1A2B3C\"."
        );
    }

    #[test]
    fn describe_is_deterministic() {
        assert_eq!(sample().describe(), sample().describe());
    }

    #[test]
    fn default_is_rendered() {
        let field = FieldSpec::optional("size", FieldType::Enum(&["small", "medium"]), "Size.")
            .with_default("medium");
        let mut out = String::new();
        field.render(&mut out, 0);
        assert_eq!(
            out,
            "- size (one of \"small\" | \"medium\", optional, defaults to medium): Size.\n"
        );
    }

    #[test]
    fn type_descriptions() {
        assert_eq!(FieldType::number_min(1.0).describe(), "number >= 1");
        assert_eq!(
            FieldType::Integer { min: Some(0), max: None }.describe(),
            "integer >= 0"
        );
        assert_eq!(
            FieldType::OneOf(vec![FieldType::Boolean, FieldType::String]).describe(),
            "boolean or string"
        );
        assert!(FieldType::Color.describe().starts_with("hex color"));
    }

    #[test]
    fn required_fields_in_order() {
        assert_eq!(sample().required_fields(), vec!["options"]);
        assert!(sample().field("value").is_some());
        assert!(sample().field("missing").is_none());
    }
}
