//! Built-in component schemas
//!
//! One schema per config kind, built once on first use and shared
//! read-only for the life of the process.

use crate::error::SchemaError;
use crate::field::{ConfigSchema, CrossFieldRule, FieldSpec, FieldType};
use crate::kind::ArtifactKind;
use once_cell::sync::Lazy;
use serde_json::json;
use std::collections::BTreeMap;

const SIZES: &[&str] = &["small", "medium", "large"];
const BUTTON_VARIANTS: &[&str] = &["primary", "secondary", "outline", "ghost", "link"];
const INPUT_TYPES: &[&str] = &["text", "email", "password", "number", "search", "tel", "url"];
const ORIENTATIONS: &[&str] = &["horizontal", "vertical"];
const SHADOWS: &[&str] = &["none", "sm", "md", "lg"];
const MODAL_SIZES: &[&str] = &["small", "medium", "large", "full"];
const TAB_VARIANTS: &[&str] = &["line", "enclosed", "pills"];
const PROGRESS_VARIANTS: &[&str] = &["linear", "circular"];
const ICON_BUTTON_VARIANTS: &[&str] = &["solid", "outline", "ghost"];
const ICONS: &[&str] = &[
    "plus",
    "minus",
    "close",
    "check",
    "search",
    "menu",
    "settings",
    "edit",
    "trash",
    "heart",
    "star",
    "arrow-left",
    "arrow-right",
];

static SCHEMAS: Lazy<BTreeMap<ArtifactKind, ConfigSchema>> = Lazy::new(|| {
    [
        button(),
        input(),
        select(),
        radio(),
        card(),
        modal(),
        tabs(),
        accordion(),
        progress(),
        icon_button(),
    ]
    .into_iter()
    .map(|schema| (schema.kind(), schema))
    .collect()
});

/// Schema for a config kind
///
/// # Errors
/// `SchemaError::UnsupportedArtifactKind` for code kinds, which have no
/// config schema.
pub fn schema_for(kind: ArtifactKind) -> Result<&'static ConfigSchema, SchemaError> {
    SCHEMAS
        .get(&kind)
        .ok_or_else(|| SchemaError::UnsupportedArtifactKind(kind.tag().to_string()))
}

/// Prompt-ready description of a config kind's schema
///
/// # Errors
/// Same as [`schema_for`].
pub fn describe(kind: ArtifactKind) -> Result<String, SchemaError> {
    schema_for(kind).map(ConfigSchema::describe)
}

/// All kinds that have a config schema, in registry order
#[must_use]
pub fn config_kinds() -> Vec<ArtifactKind> {
    SCHEMAS.keys().copied().collect()
}

fn radius() -> FieldSpec {
    FieldSpec::optional(
        "borderRadius",
        FieldType::number_range(0.0, 100.0),
        "Corner rounding in pixels.",
    )
}

fn height() -> FieldSpec {
    FieldSpec::optional(
        "height",
        FieldType::number_range(1.0, 100.0),
        "Height in pixels.",
    )
}

fn color(name: &'static str, description: &'static str) -> FieldSpec {
    FieldSpec::optional(name, FieldType::Color, description)
}

fn styles(fields: Vec<FieldSpec>) -> FieldSpec {
    FieldSpec::optional("styles", FieldType::Object(fields), "Visual overrides.")
}

fn button() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Button,
        "a clickable button with a text label.",
        vec![
            FieldSpec::required("label", FieldType::NonEmptyString, "Text shown on the button."),
            FieldSpec::required("variant", FieldType::Enum(BUTTON_VARIANTS), "Visual emphasis."),
            FieldSpec::optional("size", FieldType::Enum(SIZES), "Button size.").with_default("medium"),
            FieldSpec::optional("disabled", FieldType::Boolean, "Whether the button ignores clicks."),
            styles(vec![
                color("backgroundColor", "Fill color."),
                color("textColor", "Label color."),
                color("borderColor", "Outline color."),
                radius(),
            ]),
        ],
    )
    .with_example(json!({
        "label": "Save",
        "variant": "primary",
        "size": "medium",
        "disabled": false,
        "styles": {"backgroundColor": "#2563EB", "textColor": "#FFFFFF", "borderRadius": 8}
    }))
}

fn input() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Input,
        "a single-line text field.",
        vec![
            FieldSpec::required("type", FieldType::Enum(INPUT_TYPES), "Kind of value accepted."),
            FieldSpec::required("placeholder", FieldType::String, "Hint shown while empty."),
            FieldSpec::optional("label", FieldType::String, "Caption above the field."),
            FieldSpec::optional("disabled", FieldType::Boolean, "Whether editing is blocked."),
            FieldSpec::optional("required", FieldType::Boolean, "Whether a value must be entered."),
            styles(vec![
                FieldSpec::required("borderColor", FieldType::Color, "Border color at rest."),
                FieldSpec::required("focusColor", FieldType::Color, "Border color while focused."),
                color("backgroundColor", "Fill color."),
                color("textColor", "Text color."),
                radius(),
                height(),
            ]),
        ],
    )
    .with_example(json!({
        "type": "email",
        "placeholder": "you@example.com",
        "label": "Email",
        "required": true,
        "styles": {"borderColor": "#D1D5DB", "focusColor": "#2563EB", "height": 40}
    }))
}

fn select() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Select,
        "a dropdown that picks one option from a list.",
        vec![
            FieldSpec::optional("label", FieldType::String, "Caption above the dropdown."),
            FieldSpec::optional("placeholder", FieldType::String, "Text shown when nothing is selected."),
            FieldSpec::required(
                "options",
                FieldType::array_of(FieldType::NonEmptyString, 1),
                "Choices offered, in display order.",
            ),
            FieldSpec::optional("value", FieldType::String, "Currently selected option."),
            FieldSpec::optional("disabled", FieldType::Boolean, "Whether the dropdown is locked."),
            styles(vec![
                color("borderColor", "Border color."),
                color("backgroundColor", "Fill color."),
                color("textColor", "Text color."),
                radius(),
                height(),
            ]),
        ],
    )
    .with_rule(CrossFieldRule::MemberOf {
        field: "value",
        options: "options",
        key: None,
    })
    .with_example(json!({
        "label": "Country",
        "options": ["France", "Japan", "Peru"],
        "value": "Japan",
        "styles": {"borderColor": "#9CA3AF", "borderRadius": 4}
    }))
}

fn radio() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Radio,
        "a group of mutually exclusive options.",
        vec![
            FieldSpec::required("name", FieldType::NonEmptyString, "Form name shared by the group."),
            FieldSpec::optional("label", FieldType::String, "Caption for the group."),
            FieldSpec::required(
                "options",
                FieldType::array_of(FieldType::NonEmptyString, 1),
                "Choices offered, in display order.",
            ),
            FieldSpec::optional("value", FieldType::String, "Currently selected option."),
            FieldSpec::optional("orientation", FieldType::Enum(ORIENTATIONS), "Layout direction.")
                .with_default("vertical"),
            styles(vec![
                FieldSpec::required("selectedColor", FieldType::Color, "Color of the selected dot."),
                color("labelColor", "Option text color."),
                FieldSpec::optional("size", FieldType::Enum(SIZES), "Control size.").with_default("medium"),
            ]),
        ],
    )
    .with_rule(CrossFieldRule::MemberOf {
        field: "value",
        options: "options",
        key: None,
    })
    .with_example(json!({
        "name": "plan",
        "label": "Plan",
        "options": ["Free", "Pro"],
        "value": "Free",
        "orientation": "horizontal",
        "styles": {"selectedColor": "#16A34A"}
    }))
}

fn card() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Card,
        "a bordered container with a title, text and optional image.",
        vec![
            FieldSpec::required("title", FieldType::NonEmptyString, "Heading text."),
            FieldSpec::optional("description", FieldType::String, "Body text."),
            FieldSpec::optional(
                "image",
                FieldType::OneOf(vec![FieldType::Boolean, FieldType::NonEmptyString]),
                "Show a placeholder image (true/false) or an image URL.",
            )
            .with_default("true"),
            FieldSpec::optional(
                "actions",
                FieldType::array_of(FieldType::NonEmptyString, 1),
                "Labels of the buttons in the footer.",
            ),
            styles(vec![
                color("backgroundColor", "Fill color."),
                color("borderColor", "Border color."),
                color("textColor", "Text color."),
                radius(),
                FieldSpec::optional("shadow", FieldType::Enum(SHADOWS), "Drop shadow depth."),
            ]),
        ],
    )
    .with_example(json!({
        "title": "Mountain cabin",
        "description": "Two bedrooms, lake view.",
        "image": true,
        "actions": ["Book", "Share"],
        "styles": {"backgroundColor": "#FFFFFF", "shadow": "md", "borderRadius": 12}
    }))
}

fn modal() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Modal,
        "a dialog shown above the page.",
        vec![
            FieldSpec::required("title", FieldType::NonEmptyString, "Dialog heading."),
            FieldSpec::required("body", FieldType::String, "Dialog content text."),
            FieldSpec::optional("size", FieldType::Enum(MODAL_SIZES), "Dialog width.").with_default("medium"),
            FieldSpec::optional("closable", FieldType::Boolean, "Whether a close button is shown."),
            FieldSpec::optional("primaryAction", FieldType::NonEmptyString, "Label of the confirm button."),
            FieldSpec::optional("secondaryAction", FieldType::NonEmptyString, "Label of the cancel button."),
            styles(vec![
                color("backgroundColor", "Dialog fill color."),
                color("overlayColor", "Backdrop color."),
                color("textColor", "Text color."),
                radius(),
            ]),
        ],
    )
    .with_example(json!({
        "title": "Delete file?",
        "body": "This cannot be undone.",
        "size": "small",
        "closable": true,
        "primaryAction": "Delete",
        "secondaryAction": "Cancel",
        "styles": {"overlayColor": "#000000"}
    }))
}

fn tabs() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Tabs,
        "a strip of tabs switching between panels.",
        vec![
            FieldSpec::required(
                "tabs",
                FieldType::array_of(
                    FieldType::Object(vec![
                        FieldSpec::required("label", FieldType::NonEmptyString, "Tab caption."),
                        FieldSpec::required("content", FieldType::String, "Panel text."),
                        FieldSpec::optional("disabled", FieldType::Boolean, "Whether the tab can be selected."),
                    ]),
                    1,
                ),
                "Tabs in display order.",
            ),
            FieldSpec::optional("activeTab", FieldType::String, "Label of the selected tab."),
            FieldSpec::optional("variant", FieldType::Enum(TAB_VARIANTS), "Tab strip style."),
            styles(vec![
                FieldSpec::required("activeColor", FieldType::Color, "Selected tab text color."),
                color("inactiveColor", "Unselected tab text color."),
                color("indicatorColor", "Underline color of the selected tab."),
                color("backgroundColor", "Strip fill color."),
            ]),
        ],
    )
    .with_rule(CrossFieldRule::MemberOf {
        field: "activeTab",
        options: "tabs",
        key: Some("label"),
    })
    .with_example(json!({
        "tabs": [
            {"label": "Overview", "content": "Summary"},
            {"label": "Billing", "content": "Invoices", "disabled": true}
        ],
        "activeTab": "Overview",
        "variant": "line",
        "styles": {"activeColor": "#111827", "indicatorColor": "#2563EB"}
    }))
}

fn accordion() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Accordion,
        "a vertical list of collapsible sections.",
        vec![
            FieldSpec::required(
                "items",
                FieldType::array_of(
                    FieldType::Object(vec![
                        FieldSpec::required("title", FieldType::NonEmptyString, "Section header."),
                        FieldSpec::required("content", FieldType::String, "Section body."),
                    ]),
                    1,
                ),
                "Sections in display order.",
            ),
            FieldSpec::optional("allowMultiple", FieldType::Boolean, "Whether several sections may be open."),
            FieldSpec::optional(
                "expandedIndex",
                FieldType::Integer { min: Some(0), max: None },
                "Index of the section open initially.",
            ),
            styles(vec![
                color("headerColor", "Header text color."),
                color("backgroundColor", "Fill color."),
                color("borderColor", "Divider color."),
                radius(),
            ]),
        ],
    )
    .with_rule(CrossFieldRule::IndexWithin {
        field: "expandedIndex",
        array: "items",
    })
    .with_example(json!({
        "items": [
            {"title": "Shipping", "content": "Ships in 2 days."},
            {"title": "Returns", "content": "30-day returns."}
        ],
        "allowMultiple": false,
        "expandedIndex": 0,
        "styles": {"headerColor": "#1F2937"}
    }))
}

fn progress() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::Progress,
        "a bar showing completion of a task.",
        vec![
            FieldSpec::required("value", FieldType::number_min(0.0), "Current progress."),
            FieldSpec::required("max", FieldType::number_min(1.0), "Value that means complete."),
            FieldSpec::optional("variant", FieldType::Enum(PROGRESS_VARIANTS), "Bar shape.")
                .with_default("linear"),
            FieldSpec::optional("showLabel", FieldType::Boolean, "Whether the percentage is printed."),
            styles(vec![
                color("indicatorColor", "Filled portion color."),
                color("trackColor", "Unfilled portion color."),
                height(),
                radius(),
            ]),
        ],
    )
    .with_rule(CrossFieldRule::AtMost {
        field: "value",
        limit: "max",
    })
    .with_example(json!({
        "value": 40,
        "max": 100,
        "showLabel": true,
        "styles": {"indicatorColor": "#22C55E", "trackColor": "#E5E7EB", "height": 8}
    }))
}

fn icon_button() -> ConfigSchema {
    ConfigSchema::new(
        ArtifactKind::IconButton,
        "a compact button showing only an icon.",
        vec![
            FieldSpec::required("icon", FieldType::Enum(ICONS), "Icon to display."),
            FieldSpec::required("ariaLabel", FieldType::NonEmptyString, "Accessible name."),
            FieldSpec::optional("variant", FieldType::Enum(ICON_BUTTON_VARIANTS), "Visual emphasis."),
            FieldSpec::optional("size", FieldType::Enum(SIZES), "Button size.").with_default("medium"),
            styles(vec![
                color("backgroundColor", "Fill color."),
                color("iconColor", "Icon color."),
                radius(),
            ]),
        ],
    )
    .with_example(json!({
        "icon": "trash",
        "ariaLabel": "Delete item",
        "variant": "ghost",
        "styles": {"iconColor": "#DC2626", "borderRadius": 50}
    }))
}
