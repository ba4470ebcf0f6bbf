//! Artifact kinds
//!
//! The tag a request carries to select its schema, validator and prompt
//! template. Tags are kebab-case on the wire (`icon-button`).

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of artifact being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Button configuration
    Button,
    /// Text input configuration
    Input,
    /// Dropdown select configuration
    Select,
    /// Radio group configuration
    Radio,
    /// Content card configuration
    Card,
    /// Modal dialog configuration
    Modal,
    /// Tab strip configuration
    Tabs,
    /// Accordion configuration
    Accordion,
    /// Progress bar configuration
    Progress,
    /// Icon-only button configuration
    IconButton,
    /// Source code of a single component
    Component,
    /// Source code for several providers at once
    Playground,
}

impl ArtifactKind {
    /// Every kind, config kinds first
    pub const ALL: [ArtifactKind; 12] = [
        ArtifactKind::Button,
        ArtifactKind::Input,
        ArtifactKind::Select,
        ArtifactKind::Radio,
        ArtifactKind::Card,
        ArtifactKind::Modal,
        ArtifactKind::Tabs,
        ArtifactKind::Accordion,
        ArtifactKind::Progress,
        ArtifactKind::IconButton,
        ArtifactKind::Component,
        ArtifactKind::Playground,
    ];

    /// Wire tag
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            ArtifactKind::Button => "button",
            ArtifactKind::Input => "input",
            ArtifactKind::Select => "select",
            ArtifactKind::Radio => "radio",
            ArtifactKind::Card => "card",
            ArtifactKind::Modal => "modal",
            ArtifactKind::Tabs => "tabs",
            ArtifactKind::Accordion => "accordion",
            ArtifactKind::Progress => "progress",
            ArtifactKind::IconButton => "icon-button",
            ArtifactKind::Component => "component",
            ArtifactKind::Playground => "playground",
        }
    }

    /// Human-readable component name used in prompts
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtifactKind::Button => "Button",
            ArtifactKind::Input => "Input",
            ArtifactKind::Select => "Select",
            ArtifactKind::Radio => "Radio group",
            ArtifactKind::Card => "Card",
            ArtifactKind::Modal => "Modal",
            ArtifactKind::Tabs => "Tabs",
            ArtifactKind::Accordion => "Accordion",
            ArtifactKind::Progress => "Progress bar",
            ArtifactKind::IconButton => "Icon button",
            ArtifactKind::Component => "Component",
            ArtifactKind::Playground => "Playground",
        }
    }

    /// Whether this kind produces source code rather than a config value
    #[inline]
    #[must_use]
    pub fn is_code(&self) -> bool {
        matches!(self, ArtifactKind::Component | ArtifactKind::Playground)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ArtifactKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        ArtifactKind::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| SchemaError::UnsupportedArtifactKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tag_roundtrips_through_from_str() {
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.tag().parse::<ArtifactKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Icon-Button".parse::<ArtifactKind>().unwrap(), ArtifactKind::IconButton);
        assert_eq!(" progress ".parse::<ArtifactKind>().unwrap(), ArtifactKind::Progress);
    }

    #[test]
    fn unknown_tag_is_unsupported() {
        let err = "slider".parse::<ArtifactKind>().unwrap_err();
        assert_eq!(err, SchemaError::UnsupportedArtifactKind("slider".to_string()));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ArtifactKind::IconButton).unwrap();
        assert_eq!(json, "\"icon-button\"");
    }

    #[test]
    fn code_kinds() {
        assert!(ArtifactKind::Playground.is_code());
        assert!(ArtifactKind::Component.is_code());
        assert!(!ArtifactKind::Button.is_code());
    }

    proptest! {
        #[test]
        fn any_casing_of_a_tag_parses(index in 0..ArtifactKind::ALL.len(), mask in any::<u32>()) {
            let kind = ArtifactKind::ALL[index];
            let mangled: String = kind
                .tag()
                .chars()
                .enumerate()
                .map(|(i, c)| if mask & (1 << (i % 32)) != 0 { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(mangled.parse::<ArtifactKind>().unwrap(), kind);
        }

        #[test]
        fn unknown_tags_keep_the_input(tag in "[a-z]{1,12}") {
            prop_assume!(ArtifactKind::ALL.iter().all(|k| k.tag() != tag));
            prop_assert_eq!(
                tag.parse::<ArtifactKind>().unwrap_err(),
                SchemaError::UnsupportedArtifactKind(tag.clone())
            );
        }
    }
}
