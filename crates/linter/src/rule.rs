//! Rule and ruleset definitions.

use crate::error::ConfigError;
use oaslint_types::{RuleCategory, RuleSeverity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// What a rule does with the nodes its `given` path resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    /// Name of the rule function to run
    pub function: String,

    /// Property of each resolved node the function should inspect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Raw options for the function, validated against its schema before use
    #[serde(default, alias = "options", skip_serializing_if = "BTreeMap::is_empty")]
    pub function_options: BTreeMap<String, String>,
}

/// A declarative lint rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Unique rule identifier (e.g. `"info-contact"`); taken from the ruleset key
    #[serde(default)]
    pub id: String,

    /// Human-readable description, also used to prefix most messages
    pub description: String,

    /// Path expression selecting the nodes to check
    pub given: String,

    #[serde(default)]
    pub severity: RuleSeverity,

    #[serde(default)]
    pub category: RuleCategory,

    /// Whether the rule is part of the recommended set
    #[serde(default)]
    pub recommended: bool,

    pub then: RuleAction,
}

impl Rule {
    /// Create a rule with default severity and category.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        given: impl Into<String>,
        then: RuleAction,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            given: given.into(),
            severity: RuleSeverity::default(),
            category: RuleCategory::default(),
            recommended: false,
            then,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: RuleSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: RuleCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn recommended(mut self) -> Self {
        self.recommended = true;
        self
    }
}

impl RuleAction {
    /// Run `function` with no field and no options.
    #[must_use]
    pub fn function(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.function_options.insert(name.into(), value.into());
        self
    }
}

/// A collection of rules evaluated together against one document.
///
/// Rules are keyed by id; iteration (and therefore result order) follows id
/// order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub description: String,
    pub rules: BTreeMap<String, Arc<Rule>>,
}

#[derive(Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    description: String,
    #[serde(default)]
    rules: BTreeMap<String, Rule>,
}

impl RuleSet {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            rules: BTreeMap::new(),
        }
    }

    /// Add a rule, replacing any rule with the same id.
    pub fn insert(&mut self, rule: Rule) {
        self.rules.insert(rule.id.clone(), Arc::new(rule));
    }

    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.insert(rule);
        self
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<Rule>> {
        self.rules.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Load a ruleset from YAML (or JSON) text.
    ///
    /// ```yaml
    /// description: My rules
    /// rules:
    ///   info-contact:
    ///     description: Info section is missing contact details
    ///     given: $.info
    ///     severity: warn
    ///     category: info
    ///     then:
    ///       function: truthy
    ///       field: contact
    /// ```
    #[tracing::instrument(skip(contents), fields(size = contents.len()))]
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let document: RuleSetDocument =
            serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;

        let mut rule_set = Self::new(document.description);
        for (id, mut rule) in document.rules {
            if rule.then.function.trim().is_empty() {
                return Err(ConfigError::MissingFunction { rule: id });
            }
            rule.id.clone_from(&id);
            rule_set.rules.insert(id, Arc::new(rule));
        }
        tracing::debug!(rules = rule_set.len(), "Ruleset loaded");
        Ok(rule_set)
    }

    /// Rules marked as recommended.
    #[must_use]
    pub fn recommended_only(&self) -> Self {
        Self {
            description: self.description.clone(),
            rules: self
                .rules
                .iter()
                .filter(|(_, rule)| rule.recommended)
                .map(|(id, rule)| (id.clone(), Arc::clone(rule)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULESET: &str = r"
description: Test rules
rules:
  info-contact:
    description: Info section is missing contact details
    given: $.info
    severity: warn
    category: info
    recommended: true
    then:
      function: truthy
      field: contact
  example-value-or-externalValue:
    description: Example must have either value or externalValue
    given: $..examples.*
    severity: error
    category: examples
    then:
      function: xor
      functionOptions:
        properties: value, externalValue
";

    #[test]
    fn test_load_from_yaml() {
        let rule_set = RuleSet::from_yaml(RULESET).unwrap();
        assert_eq!(rule_set.description, "Test rules");
        assert_eq!(rule_set.len(), 2);

        let contact = rule_set.get("info-contact").unwrap();
        assert_eq!(contact.id, "info-contact");
        assert_eq!(contact.severity, RuleSeverity::Warn);
        assert_eq!(contact.category, RuleCategory::Info);
        assert_eq!(contact.then.field.as_deref(), Some("contact"));
        assert!(contact.recommended);

        let xor = rule_set.get("example-value-or-externalValue").unwrap();
        assert_eq!(xor.severity, RuleSeverity::Error);
        assert_eq!(
            xor.then.function_options.get("properties").map(String::as_str),
            Some("value, externalValue")
        );
    }

    #[test]
    fn test_rules_iterate_in_id_order() {
        let rule_set = RuleSet::from_yaml(RULESET).unwrap();
        let ids: Vec<&str> = rule_set.rules.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["example-value-or-externalValue", "info-contact"]);
    }

    #[test]
    fn test_recommended_only() {
        let rule_set = RuleSet::from_yaml(RULESET).unwrap().recommended_only();
        assert_eq!(rule_set.len(), 1);
        assert!(rule_set.get("info-contact").is_some());
    }

    #[test]
    fn test_invalid_severity_is_rejected() {
        let yaml = "rules:\n  r:\n    description: d\n    given: $\n    severity: fatal\n    then:\n      function: truthy\n";
        assert!(matches!(
            RuleSet::from_yaml(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_blank_function_is_rejected() {
        let yaml = "rules:\n  r:\n    description: d\n    given: $\n    then:\n      function: ' '\n";
        assert!(matches!(
            RuleSet::from_yaml(yaml),
            Err(ConfigError::MissingFunction { rule }) if rule == "r"
        ));
    }

    #[test]
    fn test_builder() {
        let rule = Rule::new(
            "xor-rule",
            "Pick one",
            "$.glitter",
            RuleAction::function("xor").with_option("properties", "a, b"),
        )
        .with_severity(RuleSeverity::Error)
        .with_category(RuleCategory::Schemas);
        let rule_set = RuleSet::new("built").with_rule(rule);
        let rule = rule_set.get("xor-rule").unwrap();
        assert_eq!(rule.then.function, "xor");
        assert_eq!(rule.severity, RuleSeverity::Error);
        assert!(!rule.recommended);
    }
}
