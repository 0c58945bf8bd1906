//! Rule categories and their display metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a rule belongs to, used to group findings in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Request/response examples
    Examples,
    /// Operations and paths
    Operations,
    /// The `info` section: contact, license, description
    #[default]
    Info,
    /// Descriptions and markdown content
    Descriptions,
    /// Schema definitions
    Schemas,
    /// Security schemes and requirements
    Security,
    /// Tags and their ordering
    Tags,
    /// Structural validity of the document
    Validation,
}

/// Display metadata for a [`RuleCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: RuleCategory,
    /// Stable identifier, as used in rulesets and serialized results
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Category table, in declaration order of [`RuleCategory`].
pub static CATEGORIES: [CategoryInfo; 8] = [
    CategoryInfo {
        category: RuleCategory::Examples,
        id: "examples",
        name: "Examples",
        description: "Examples help consumers understand how API calls should look",
    },
    CategoryInfo {
        category: RuleCategory::Operations,
        id: "operations",
        name: "Operations",
        description: "Operations are the core of the contract, they define paths and HTTP methods",
    },
    CategoryInfo {
        category: RuleCategory::Info,
        id: "info",
        name: "Contract Information",
        description: "The info object contains licencing, contact, authorship details and more",
    },
    CategoryInfo {
        category: RuleCategory::Descriptions,
        id: "descriptions",
        name: "Descriptions",
        description: "Documentation is really important, descriptions must be clear and safe",
    },
    CategoryInfo {
        category: RuleCategory::Schemas,
        id: "schemas",
        name: "Schemas",
        description: "Schemas are how request bodies and response payloads are defined",
    },
    CategoryInfo {
        category: RuleCategory::Security,
        id: "security",
        name: "Security",
        description: "Security plays a central role in RESTful APIs",
    },
    CategoryInfo {
        category: RuleCategory::Tags,
        id: "tags",
        name: "Tags",
        description: "Tags are used as meta-data for operations",
    },
    CategoryInfo {
        category: RuleCategory::Validation,
        id: "validation",
        name: "Validation",
        description: "Structural checks that the document is usable at all",
    },
];

impl RuleCategory {
    /// Metadata for this category.
    #[must_use]
    pub fn info(self) -> &'static CategoryInfo {
        &CATEGORIES[self as usize]
    }

    /// Stable identifier, e.g. `"tags"`.
    #[must_use]
    pub fn id(self) -> &'static str {
        self.info().id
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        CATEGORIES
            .iter()
            .find(|info| info.id == lower)
            .map(|info| info.category)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_declaration_order() {
        for (index, info) in CATEGORIES.iter().enumerate() {
            assert_eq!(info.category as usize, index);
            assert_eq!(info.category.info(), info);
        }
    }

    #[test]
    fn test_category_roundtrip_through_id() {
        for info in &CATEGORIES {
            assert_eq!(info.id.parse::<RuleCategory>(), Ok(info.category));
            assert_eq!(info.category.to_string(), info.id);
        }
    }

    #[test]
    fn test_unknown_category() {
        assert!("owasp".parse::<RuleCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_as_id() {
        assert_eq!(
            serde_json::to_string(&RuleCategory::Validation).unwrap(),
            "\"validation\""
        );
    }
}
