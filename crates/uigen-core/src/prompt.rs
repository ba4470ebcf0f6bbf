//! Prompt construction
//!
//! Prompts are pure functions of their inputs. JSON state is serialized
//! with sorted keys and providers are walked in request order, so the same
//! request always yields the same bytes and retries differ only by the
//! feedback block.

use crate::error::GenerationError;
use indexmap::IndexMap;
use serde_json::Value;
use uigen_schema::{schema_for, ArtifactKind, ConfigSchema, Provider, COLOR_FORMAT};
use uigen_validate::COMPONENT_SOURCE_KEY;

/// Prompt for a config kind
///
/// `prior_errors` are the previous attempt's feedback lines; the correction
/// block is only appended when there are any.
///
/// # Errors
/// `UnsupportedArtifactKind` for code kinds.
pub fn build_config_prompt(
    kind: ArtifactKind,
    current: &Value,
    intent: &str,
    prior_errors: &[String],
) -> Result<String, GenerationError> {
    let schema = schema_for(kind)?;
    Ok(config_prompt(schema, current, intent, prior_errors))
}

pub(crate) fn config_prompt(
    schema: &ConfigSchema,
    current: &Value,
    intent: &str,
    prior_errors: &[String],
) -> String {
    let display = schema.kind().display_name();
    let mut prompt = format!(
        "You are a UI configuration assistant. You update the configuration of a single {display} component.\n\n"
    );

    section(&mut prompt, "Schema", &schema.describe());
    section(&mut prompt, "Current configuration", &pretty(current));
    section(&mut prompt, "Request", intent);
    section(
        &mut prompt,
        "Instructions",
        &[
            "- Modify only the properties the request mentions.".to_string(),
            "- Preserve every other property exactly as it is. Omit a field to leave it unchanged.".to_string(),
            "- Respond with a single raw JSON object and nothing else: no prose, no markdown code fences.".to_string(),
            format!("- Every color must be {COLOR_FORMAT}."),
        ]
        .join("\n"),
    );
    feedback(&mut prompt, prior_errors);
    prompt
}

/// Prompt for multi-provider code generation
///
/// Lists each provider's import path and closed component vocabulary and
/// requires one object keyed by provider id.
#[must_use]
pub fn build_playground_prompt(
    providers: &[Provider],
    current: &IndexMap<Provider, String>,
    intent: &str,
    prior_errors: &[String],
) -> String {
    let mut prompt = String::from(
        "You are a React and TypeScript developer. Implement the requested UI once for each of the component libraries below.\n\n",
    );

    let libraries = providers
        .iter()
        .map(|provider| {
            let caps = provider.capabilities();
            format!(
                "### {id}: {name}\nImport components from \"{path}\" with named imports, for example: import {{ {first} }} from \"{path}\";\nAllowed components: {list}",
                id = provider.id(),
                name = caps.display_name,
                path = caps.import_path,
                first = caps.components.first().copied().unwrap_or("Box"),
                list = caps.components.join(", "),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    section(&mut prompt, "Libraries", &libraries);

    let sources = providers
        .iter()
        .map(|provider| match current.get(provider).filter(|s| !s.trim().is_empty()) {
            Some(source) => format!("### {}\n```tsx\n{}\n```", provider.id(), source.trim_end()),
            None => format!("### {}\n(none yet)", provider.id()),
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    section(&mut prompt, "Current source", &sources);
    section(&mut prompt, "Request", intent);

    let shape = providers
        .iter()
        .map(|provider| format!("\"{}\": \"<full TSX source>\"", provider.id()))
        .collect::<Vec<_>>()
        .join(", ");
    section(
        &mut prompt,
        "Instructions",
        &[
            "- Write each source as a complete TSX module whose component is the default export.".to_string(),
            "- Import React hooks from \"react\" as needed.".to_string(),
            "- Use only the allowed components of each library. Any other component is rejected.".to_string(),
            "- Never import one library's package inside another library's source.".to_string(),
            format!("- Respond with a single raw JSON object keyed by library id: {{{shape}}}"),
            "- No prose and no markdown code fences outside the JSON string values.".to_string(),
        ]
        .join("\n"),
    );
    feedback(&mut prompt, prior_errors);
    prompt
}

/// Prompt for rewriting a single component
#[must_use]
pub fn build_component_prompt(current_source: &str, intent: &str, prior_errors: &[String]) -> String {
    let mut prompt = String::from(
        "You are a React and TypeScript developer. You rewrite a single UI component according to a user's request.\n\n",
    );

    let current = if current_source.trim().is_empty() {
        "(none yet)".to_string()
    } else {
        format!("```tsx\n{}\n```", current_source.trim_end())
    };
    section(&mut prompt, "Current source", &current);
    section(&mut prompt, "Request", intent);
    section(
        &mut prompt,
        "Instructions",
        &[
            "- Change only what the request asks for and keep the rest of the component intact.".to_string(),
            "- Return the complete TSX module with the component as the default export.".to_string(),
            format!("- Respond with a single raw JSON object: {{\"{COMPONENT_SOURCE_KEY}\": \"<full TSX source>\"}}"),
            "- No prose and no markdown code fences outside the JSON string value.".to_string(),
        ]
        .join("\n"),
    );
    feedback(&mut prompt, prior_errors);
    prompt
}

fn section(prompt: &mut String, title: &str, body: &str) {
    prompt.push_str("## ");
    prompt.push_str(title);
    prompt.push('\n');
    prompt.push_str(body);
    prompt.push_str("\n\n");
}

fn feedback(prompt: &mut String, prior_errors: &[String]) {
    if prior_errors.is_empty() {
        return;
    }
    let mut body = String::from("Your previous response was rejected with these errors:\n");
    for error in prior_errors {
        body.push_str("- ");
        body.push_str(error);
        body.push('\n');
    }
    body.push_str("Correct every error listed above in your new response.");
    section(prompt, "Previous attempt failed", &body);
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_prompt_has_every_section() {
        let prompt = build_config_prompt(
            ArtifactKind::Progress,
            &json!({"value": 10, "max": 100}),
            "make the bar green",
            &[],
        )
        .unwrap();

        assert!(prompt.contains("single Progress bar component"));
        assert!(prompt.contains("## Schema\nProgress bar configuration:"));
        assert!(prompt.contains("\"max\": 100"));
        assert!(prompt.contains("## Request\nmake the bar green"));
        assert!(prompt.contains("Modify only the properties the request mentions."));
        assert!(prompt.contains("raw JSON object"));
        assert!(!prompt.contains("Previous attempt failed"));
    }

    #[test]
    fn feedback_block_is_appended_verbatim() {
        let errors = vec!["styles.indicatorColor: must be a 6-digit hex color like \"#1A2B3C\", got \"green\"".to_string()];
        let prompt = build_config_prompt(ArtifactKind::Progress, &json!({}), "green", &errors).unwrap();
        assert!(prompt.contains("## Previous attempt failed"));
        assert!(prompt.contains(&format!("- {}", errors[0])));
        assert!(prompt.ends_with("Correct every error listed above in your new response.\n\n"));
    }

    #[test]
    fn config_prompt_is_deterministic() {
        let a = json!({"value": 10, "max": 100, "styles": {"trackColor": "#E5E7EB", "height": 8}});
        let b = json!({"styles": {"height": 8, "trackColor": "#E5E7EB"}, "max": 100, "value": 10});
        let first = build_config_prompt(ArtifactKind::Progress, &a, "x", &[]).unwrap();
        let second = build_config_prompt(ArtifactKind::Progress, &b, "x", &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn code_kinds_have_no_config_prompt() {
        assert_eq!(
            build_config_prompt(ArtifactKind::Playground, &json!({}), "x", &[]).unwrap_err(),
            GenerationError::UnsupportedArtifactKind("playground".into())
        );
    }

    #[test]
    fn playground_prompt_lists_vocabularies_in_request_order() {
        let providers = [Provider::Chakra, Provider::Mui];
        let prompt = build_playground_prompt(&providers, &IndexMap::new(), "a login form", &[]);

        let chakra = prompt.find("### chakra: Chakra UI").unwrap();
        let mui = prompt.find("### mui: Material UI").unwrap();
        assert!(chakra < mui);
        assert!(prompt.contains("from \"@chakra-ui/react\""));
        assert!(prompt.contains("LinearProgress"));
        assert!(prompt.contains("{\"chakra\": \"<full TSX source>\", \"mui\": \"<full TSX source>\"}"));
        assert!(prompt.contains("### mui\n(none yet)"));
    }

    #[test]
    fn playground_prompt_embeds_current_sources() {
        let mut current = IndexMap::new();
        current.insert(Provider::Mui, "export default function A() { return null; }\n".to_string());
        let prompt = build_playground_prompt(&[Provider::Mui], &current, "x", &[]);
        assert!(prompt.contains("### mui\n```tsx\nexport default function A() { return null; }\n```"));
    }

    #[test]
    fn component_prompt_requests_code_key() {
        let prompt = build_component_prompt("", "a counter", &["source: syntax error at line 1, column 5: unexpected `=`".into()]);
        assert!(prompt.contains("{\"code\": \"<full TSX source>\"}"));
        assert!(prompt.contains("- source: syntax error at line 1"));
    }
}
