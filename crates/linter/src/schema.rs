//! Option schemas for rule functions, and validation of configured options.
//!
//! Rulesets configure functions with a plain string-to-string mapping. Before
//! a function runs, that mapping is checked against the function's
//! [`RuleFunctionSchema`] and converted into typed [`RuleOptions`]: lists are
//! split once, patterns compiled once. A function body never sees raw strings
//! and never runs against options that failed validation.

use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

/// Separator for list-valued options.
pub const LIST_DELIMITER: char = ',';

/// How a single option is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Free text, kept verbatim
    Text,
    /// Comma-delimited list whose element count must lie in `[min, max]`
    List {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// A regular expression, compiled during validation
    Pattern,
}

/// Declaration of one option a function understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionProperty {
    pub name: &'static str,
    pub kind: OptionKind,
}

/// Options schema declared by a rule function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFunctionSchema {
    /// Function name, as referenced from a rule's `then.function`
    pub name: &'static str,
    /// Options that must be present
    pub required: Vec<&'static str>,
    /// Typed declarations for the options the function reads
    pub properties: Vec<OptionProperty>,
}

impl RuleFunctionSchema {
    /// A schema with no options at all.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    fn property(&self, name: &str) -> Option<&OptionProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One configuration defect found by [`validate_options`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("'{option}' is required")]
    MissingRequired { option: String },

    #[error("'{option}' must contain at least {min} values, found {found}")]
    TooFewValues {
        option: String,
        min: usize,
        found: usize,
    },

    #[error("'{option}' must contain at most {max} values, found {found}")]
    TooManyValues {
        option: String,
        max: usize,
        found: usize,
    },

    #[error("'{option}' is not a valid regular expression: {message}")]
    InvalidPattern { option: String, message: String },
}

/// A validated, typed option value.
#[derive(Debug, Clone)]
pub enum OptionValue {
    Text(String),
    List(Vec<String>),
    Pattern(Regex),
}

/// Options that passed schema validation.
///
/// Only [`validate_options`] creates non-empty instances.
#[derive(Debug, Clone, Default)]
pub struct RuleOptions {
    values: BTreeMap<String, OptionValue>,
}

impl RuleOptions {
    /// Options for a function that declares none.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// A text option. List and pattern options are not returned.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// A list option, already split and trimmed.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[String]> {
        match self.values.get(name)? {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// A compiled pattern option.
    #[must_use]
    pub fn pattern(&self, name: &str) -> Option<&Regex> {
        match self.values.get(name)? {
            OptionValue::Pattern(regex) => Some(regex),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Split a list option on [`LIST_DELIMITER`], trimming whitespace and
/// dropping empty elements.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check configured options against a schema.
///
/// Every defect is collected: a missing required option, a list outside its
/// bounds (an absent list counts as zero values), an uncompilable pattern.
/// Options the schema does not declare are kept as text.
pub fn validate_options(
    schema: &RuleFunctionSchema,
    raw: &BTreeMap<String, String>,
) -> Result<RuleOptions, Vec<OptionError>> {
    let mut errors = Vec::new();
    let mut values = BTreeMap::new();

    for required in &schema.required {
        if !raw.contains_key(*required) {
            errors.push(OptionError::MissingRequired {
                option: (*required).to_string(),
            });
        }
    }

    for property in &schema.properties {
        let OptionKind::List { min, max } = property.kind else {
            continue;
        };
        let found = raw.get(property.name).map_or(0, |value| split_list(value).len());
        if let Some(min) = min {
            if found < min {
                errors.push(OptionError::TooFewValues {
                    option: property.name.to_string(),
                    min,
                    found,
                });
            }
        }
        if let Some(max) = max {
            if found > max {
                errors.push(OptionError::TooManyValues {
                    option: property.name.to_string(),
                    max,
                    found,
                });
            }
        }
    }

    for (name, value) in raw {
        let kind = schema.property(name).map_or(OptionKind::Text, |p| p.kind);
        let typed = match kind {
            OptionKind::Text => OptionValue::Text(value.clone()),
            OptionKind::List { .. } => OptionValue::List(split_list(value)),
            OptionKind::Pattern => match Regex::new(value) {
                Ok(regex) => OptionValue::Pattern(regex),
                Err(err) => {
                    errors.push(OptionError::InvalidPattern {
                        option: name.clone(),
                        message: err.to_string(),
                    });
                    continue;
                }
            },
        };
        values.insert(name.clone(), typed);
    }

    if errors.is_empty() {
        Ok(RuleOptions { values })
    } else {
        tracing::debug!(function = schema.name, errors = errors.len(), "Options failed validation");
        Err(errors)
    }
}
