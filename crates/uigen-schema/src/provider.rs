//! Provider capability registry
//!
//! Static facts about each supported component library: where components
//! are imported from and which components generated code may use.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Import path and component vocabulary of one library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderCapabilities {
    /// Display name used in prompts
    pub display_name: &'static str,
    /// Package components are imported from
    pub import_path: &'static str,
    /// Closed list of permitted component names
    pub components: &'static [&'static str],
}

const MUI: ProviderCapabilities = ProviderCapabilities {
    display_name: "Material UI",
    import_path: "@mui/material",
    components: &[
        "Accordion",
        "AccordionDetails",
        "AccordionSummary",
        "Alert",
        "Box",
        "Button",
        "ButtonGroup",
        "Card",
        "CardActions",
        "CardContent",
        "CardHeader",
        "CardMedia",
        "Checkbox",
        "Chip",
        "CircularProgress",
        "Container",
        "Dialog",
        "DialogActions",
        "DialogContent",
        "DialogTitle",
        "Divider",
        "FormControl",
        "FormControlLabel",
        "FormLabel",
        "Grid",
        "IconButton",
        "InputLabel",
        "LinearProgress",
        "MenuItem",
        "Paper",
        "Radio",
        "RadioGroup",
        "Select",
        "Stack",
        "Switch",
        "Tab",
        "Tabs",
        "TextField",
        "Tooltip",
        "Typography",
    ],
};

const CHAKRA: ProviderCapabilities = ProviderCapabilities {
    display_name: "Chakra UI",
    import_path: "@chakra-ui/react",
    components: &[
        "Accordion",
        "AccordionButton",
        "AccordionIcon",
        "AccordionItem",
        "AccordionPanel",
        "Badge",
        "Box",
        "Button",
        "ButtonGroup",
        "Card",
        "CardBody",
        "CardFooter",
        "CardHeader",
        "Checkbox",
        "Flex",
        "FormControl",
        "FormLabel",
        "HStack",
        "Heading",
        "IconButton",
        "Image",
        "Input",
        "Modal",
        "ModalBody",
        "ModalCloseButton",
        "ModalContent",
        "ModalFooter",
        "ModalHeader",
        "ModalOverlay",
        "Progress",
        "Radio",
        "RadioGroup",
        "Select",
        "Stack",
        "Switch",
        "Tab",
        "TabList",
        "TabPanel",
        "TabPanels",
        "Tabs",
        "Text",
        "VStack",
    ],
};

const ANTD: ProviderCapabilities = ProviderCapabilities {
    display_name: "Ant Design",
    import_path: "antd",
    components: &[
        "Button",
        "Card",
        "Checkbox",
        "Col",
        "Collapse",
        "Divider",
        "Flex",
        "Form",
        "Image",
        "Input",
        "Modal",
        "Progress",
        "Radio",
        "Row",
        "Select",
        "Space",
        "Switch",
        "Tabs",
        "Tag",
        "Tooltip",
        "Typography",
    ],
};

const MANTINE: ProviderCapabilities = ProviderCapabilities {
    display_name: "Mantine",
    import_path: "@mantine/core",
    components: &[
        "Accordion",
        "ActionIcon",
        "Badge",
        "Box",
        "Button",
        "Card",
        "Checkbox",
        "Group",
        "Image",
        "Input",
        "Modal",
        "Paper",
        "Progress",
        "Radio",
        "Select",
        "SimpleGrid",
        "Stack",
        "Switch",
        "Tabs",
        "Text",
        "TextInput",
        "Title",
    ],
};

/// Component library targeted by code generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Material UI
    Mui,
    /// Chakra UI
    Chakra,
    /// Ant Design
    Antd,
    /// Mantine
    Mantine,
}

impl Provider {
    /// Every supported provider
    pub const ALL: [Provider; 4] = [Provider::Mui, Provider::Chakra, Provider::Antd, Provider::Mantine];

    /// Wire identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Mui => "mui",
            Provider::Chakra => "chakra",
            Provider::Antd => "antd",
            Provider::Mantine => "mantine",
        }
    }

    /// Static capabilities
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> &'static ProviderCapabilities {
        match self {
            Provider::Mui => &MUI,
            Provider::Chakra => &CHAKRA,
            Provider::Antd => &ANTD,
            Provider::Mantine => &MANTINE,
        }
    }

    /// Package components are imported from
    #[inline]
    #[must_use]
    pub fn import_path(&self) -> &'static str {
        self.capabilities().import_path
    }

    /// Whether generated code may use `component`
    #[inline]
    #[must_use]
    pub fn allows(&self, component: &str) -> bool {
        self.capabilities().components.contains(&component)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Provider::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(id))
            .ok_or_else(|| SchemaError::UnsupportedProvider(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip() {
        for provider in Provider::ALL {
            assert_eq!(provider.id().parse::<Provider>().unwrap(), provider);
        }
    }

    #[test]
    fn unknown_provider() {
        assert_eq!(
            "bootstrap".parse::<Provider>().unwrap_err(),
            SchemaError::UnsupportedProvider("bootstrap".to_string())
        );
    }

    #[test]
    fn vocabulary_is_closed() {
        assert!(Provider::Mui.allows("LinearProgress"));
        assert!(!Provider::Mui.allows("Progress"));
        assert!(Provider::Chakra.allows("Progress"));
        assert!(!Provider::Antd.allows("TextField"));
    }

    #[test]
    fn vocabularies_are_sorted_and_unique() {
        for provider in Provider::ALL {
            let components = provider.capabilities().components;
            let mut sorted = components.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted, components, "{provider}");
        }
    }

    #[test]
    fn import_paths() {
        assert_eq!(Provider::Mui.import_path(), "@mui/material");
        assert_eq!(Provider::Chakra.import_path(), "@chakra-ui/react");
    }
}
