//! TSX syntax validation
//!
//! Generated source is parsed with the tree-sitter TSX grammar. Passing
//! means the source is well-formed, nothing more: no type checking, no
//! module resolution. Provider checks additionally enforce that imports from
//! a library's package stay inside its component vocabulary.

use crate::outcome::{FieldError, ValidationOutcome};
use serde_json::Value;
use tree_sitter::{Node, Parser, Tree};
use uigen_schema::Provider;

/// Path used for errors of a standalone source check
const SOURCE_PATH: &str = "source";

/// Longest snippet quoted in a diagnostic
const MAX_SNIPPET: usize = 40;

/// Stateless TSX checker
///
/// A fresh parser is created per check; tree-sitter parsers are not `Sync`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntaxValidator;

/// How a name was brought into scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Default,
    Named,
    Namespace,
}

/// One imported binding
#[derive(Debug, Clone, PartialEq, Eq)]
struct Import {
    module: String,
    name: String,
    binding: Binding,
    line: usize,
}

impl SyntaxValidator {
    /// Create validator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Check that `source` parses as TSX
    ///
    /// Accepted value is the source as a JSON string.
    #[must_use]
    pub fn check_compiles(&self, source: &str) -> ValidationOutcome {
        match parse(source) {
            Ok(_) => ValidationOutcome::Accepted {
                value: Value::String(source.to_string()),
            },
            Err(message) => ValidationOutcome::rejected(SOURCE_PATH, message),
        }
    }

    /// Check a provider's source: syntax first, then vocabulary
    ///
    /// Errors are reported under the provider id so multi-provider feedback
    /// names the failing library.
    #[must_use]
    pub fn check_provider(&self, provider: Provider, source: &str) -> ValidationOutcome {
        let tree = match parse(source) {
            Ok(tree) => tree,
            Err(message) => return ValidationOutcome::rejected(provider.id(), message),
        };

        let errors: Vec<FieldError> = vocabulary_violations(provider, &tree, source)
            .into_iter()
            .map(|message| FieldError::new(provider.id(), message))
            .collect();

        if errors.is_empty() {
            ValidationOutcome::Accepted {
                value: Value::String(source.to_string()),
            }
        } else {
            ValidationOutcome::Rejected { errors }
        }
    }
}

fn parse(source: &str) -> Result<Tree, String> {
    if source.trim().is_empty() {
        return Err("source is empty".to_string());
    }

    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_typescript::LANGUAGE_TSX.into())
        .map_err(|e| format!("failed to load TSX grammar: {e}"))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| "parser produced no syntax tree".to_string())?;

    let root = tree.root_node();
    if root.has_error() {
        let message = first_error(root)
            .map(|node| describe_error(node, source))
            .unwrap_or_else(|| "syntax error".to_string());
        tracing::debug!(%message, "source failed to parse");
        return Err(message);
    }
    Ok(tree)
}

/// Depth-first search for the first ERROR or MISSING node
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else { continue };
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

fn describe_error(node: Node<'_>, source: &str) -> String {
    let position = node.start_position();
    let location = format!(
        "syntax error at line {}, column {}",
        position.row + 1,
        position.column + 1
    );
    if node.is_missing() {
        return format!("{location}: missing `{}`", node.kind());
    }

    let text = node.utf8_text(source.as_bytes()).unwrap_or_default();
    let first_line = text.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return format!("{location}: unexpected input");
    }
    let snippet: String = first_line.chars().take(MAX_SNIPPET).collect();
    format!("{location}: unexpected `{snippet}`")
}

fn vocabulary_violations(provider: Provider, tree: &Tree, source: &str) -> Vec<String> {
    let own_path = provider.import_path();
    let display_name = provider.capabilities().display_name;
    let mut violations = Vec::new();
    // Local names that stand for the whole provider package, e.g. `M` in `<M.Slider />`
    let mut package_aliases: Vec<String> = Vec::new();

    for import in imports(tree.root_node(), source) {
        if let Some(other) = Provider::ALL
            .into_iter()
            .find(|p| *p != provider && belongs_to(&import.module, p.import_path()))
        {
            violations.push(format!(
                "line {}: imports from \"{}\", which belongs to {other}; use {display_name} only",
                import.line, import.module
            ));
            continue;
        }

        let component = if import.module == own_path {
            match import.binding {
                Binding::Named => import.name.as_str(),
                Binding::Default => {
                    package_aliases.push(import.name);
                    continue;
                }
                Binding::Namespace => {
                    violations.push(format!(
                        "line {}: namespace import `* as {}` from \"{own_path}\" is not allowed; import {display_name} components by name",
                        import.line, import.name
                    ));
                    package_aliases.push(import.name);
                    continue;
                }
            }
        } else if let Some(subpath) = import
            .module
            .strip_prefix(own_path)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            subpath.rsplit('/').next().unwrap_or(subpath)
        } else {
            continue;
        };

        if is_component_name(component) && !provider.allows(component) {
            violations.push(format!(
                "line {}: component `{component}` is not available in {display_name}",
                import.line
            ));
        }
    }

    if !package_aliases.is_empty() {
        let mut tags = Vec::new();
        member_tags(tree.root_node(), source, &mut tags);
        for (object, component, line) in tags {
            if package_aliases.contains(&object) && is_component_name(&component) && !provider.allows(&component) {
                violations.push(format!(
                    "line {line}: component `{component}` is not available in {display_name}"
                ));
            }
        }
    }

    violations
}

/// Collect `<Object.Component>` tag names as (object, component, line)
fn member_tags(node: Node<'_>, source: &str, found: &mut Vec<(String, String, usize)>) {
    if matches!(node.kind(), "jsx_opening_element" | "jsx_self_closing_element") {
        if let Some(name) = node.child_by_field_name("name").filter(|n| n.kind() == "member_expression") {
            let object = name.child_by_field_name("object").or_else(|| name.named_child(0));
            let property = name
                .child_by_field_name("property")
                .or_else(|| name.named_child(name.named_child_count().saturating_sub(1)));
            if let (Some(object), Some(property)) = (object, property) {
                let text = |n: Node<'_>| n.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
                found.push((text(object), text(property), node.start_position().row + 1));
            }
        }
    }
    for i in 0..node.named_child_count() {
        if let Some(child) = node.named_child(i) {
            member_tags(child, source, found);
        }
    }
}

fn belongs_to(module: &str, import_path: &str) -> bool {
    module == import_path
        || module
            .strip_prefix(import_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Components are PascalCase; hooks and helpers are not restricted
fn is_component_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

fn imports(root: Node<'_>, source: &str) -> Vec<Import> {
    let text = |node: Node<'_>| node.utf8_text(source.as_bytes()).unwrap_or_default().to_string();
    let mut found = Vec::new();

    for i in 0..root.named_child_count() {
        let Some(statement) = root.named_child(i) else { continue };
        if statement.kind() != "import_statement" {
            continue;
        }
        let Some(module) = statement.child_by_field_name("source") else { continue };
        let module = text(module).trim_matches(|c| c == '"' || c == '\'').to_string();
        let line = statement.start_position().row + 1;

        for j in 0..statement.named_child_count() {
            let Some(clause) = statement.named_child(j) else { continue };
            if clause.kind() != "import_clause" {
                continue;
            }
            for k in 0..clause.named_child_count() {
                let Some(binding) = clause.named_child(k) else { continue };
                match binding.kind() {
                    "identifier" => found.push(Import {
                        module: module.clone(),
                        name: text(binding),
                        binding: Binding::Default,
                        line,
                    }),
                    "namespace_import" => {
                        let alias = (0..binding.named_child_count())
                            .filter_map(|m| binding.named_child(m))
                            .find(|n| n.kind() == "identifier");
                        if let Some(alias) = alias {
                            found.push(Import {
                                module: module.clone(),
                                name: text(alias),
                                binding: Binding::Namespace,
                                line,
                            });
                        }
                    }
                    "named_imports" => {
                        for m in 0..binding.named_child_count() {
                            let Some(specifier) = binding.named_child(m) else { continue };
                            if specifier.kind() != "import_specifier" {
                                continue;
                            }
                            if let Some(name) = specifier.child_by_field_name("name") {
                                found.push(Import {
                                    module: module.clone(),
                                    name: text(name),
                                    binding: Binding::Named,
                                    line,
                                });
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    found
}
