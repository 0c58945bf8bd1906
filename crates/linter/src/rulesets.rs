//! Built-in rulesets.

use crate::rule::{Rule, RuleAction, RuleSet};
use oaslint_types::{RuleCategory, RuleSeverity};

fn truthy(
    id: &str,
    description: &str,
    given: &str,
    field: &str,
    severity: RuleSeverity,
) -> Rule {
    Rule::new(
        id,
        description,
        given,
        RuleAction::function("truthy").with_field(field),
    )
    .with_severity(severity)
    .with_category(RuleCategory::Info)
    .recommended()
}

fn no_markdown_pattern(id: &str, description: &str, pattern: &str) -> Rule {
    Rule::new(
        id,
        description,
        "$..description",
        RuleAction::function("pattern").with_option("notMatch", pattern),
    )
    .with_severity(RuleSeverity::Error)
    .with_category(RuleCategory::Security)
    .recommended()
}

/// The recommended ruleset for OpenAPI 3 documents.
#[must_use]
pub fn recommended() -> RuleSet {
    RuleSet::new("Recommended rules for OpenAPI 3 documents")
        .with_rule(truthy(
            "contact-properties",
            "Contact details are incomplete",
            "$.info.contact",
            "url",
            RuleSeverity::Info,
        ))
        .with_rule(truthy(
            "info-contact",
            "Info section is missing contact details",
            "$.info",
            "contact",
            RuleSeverity::Warn,
        ))
        .with_rule(truthy(
            "info-description",
            "Info section is missing a description",
            "$.info",
            "description",
            RuleSeverity::Error,
        ))
        .with_rule(truthy(
            "info-license",
            "Info section should contain a license",
            "$.info",
            "license",
            RuleSeverity::Info,
        ))
        .with_rule(truthy(
            "license-url",
            "License should contain an url",
            "$.info.license",
            "url",
            RuleSeverity::Info,
        ))
        .with_rule(no_markdown_pattern(
            "no-eval-in-markdown",
            "Markdown descriptions must not have 'eval('",
            r"eval\(",
        ))
        .with_rule(no_markdown_pattern(
            "no-script-tags-in-markdown",
            "Markdown descriptions must not contain '<script>' tags",
            "<script",
        ))
        .with_rule(
            Rule::new(
                "openapi-tags-alphabetical",
                "Tags must be in alphabetical order",
                "$",
                RuleAction::function("alphabetical")
                    .with_field("tags")
                    .with_option("keyedBy", "name"),
            )
            .with_severity(RuleSeverity::Info)
            .with_category(RuleCategory::Tags),
        )
        .with_rule(
            Rule::new(
                "oas3-api-servers",
                "Check for valid API servers definition",
                "$",
                RuleAction::function("api_servers"),
            )
            .with_severity(RuleSeverity::Warn)
            .with_category(RuleCategory::Validation)
            .recommended(),
        )
        .with_rule(
            Rule::new(
                "oas3-examples-value-or-externalValue",
                "Examples must have either 'value' or 'externalValue' defined, not both",
                "$..content.*.examples.*",
                RuleAction::function("xor").with_option("properties", "value, externalValue"),
            )
            .with_severity(RuleSeverity::Warn)
            .with_category(RuleCategory::Examples)
            .recommended(),
        )
}
