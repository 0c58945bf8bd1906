use super::span;
use crate::path::ResolvedNode;
use crate::results::RuleFunctionResult;
use crate::schema::{OptionKind, OptionProperty, RuleFunctionSchema};
use crate::traits::{RuleFunction, RuleFunctionContext};

/// Exactly one of two named properties must be present on each node.
///
/// Configured with `properties: a, b`. Nodes with neither or both produce
/// one finding each.
pub struct XorFunctionImpl;

impl RuleFunction for XorFunctionImpl {
    fn schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema {
            name: "xor",
            required: vec!["properties"],
            properties: vec![OptionProperty {
                name: "properties",
                kind: OptionKind::List {
                    min: Some(2),
                    max: Some(2),
                },
            }],
        }
    }

    fn run_rule(
        &self,
        nodes: &[ResolvedNode],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let Some([first, second]) = context.options.list("properties") else {
            return Vec::new();
        };

        let mut results = Vec::new();
        for resolved in nodes {
            let node = &resolved.node;
            let found = [first, second]
                .iter()
                .filter(|property| node.get(property.as_str()).is_some())
                .count();

            let detail = match found {
                0 => format!("'{first}' or '{second}' must be defined"),
                2 => format!("'{first}' and '{second}' must not both be defined"),
                _ => continue,
            };
            let (start, end) = span(node);
            results.push(context.result(context.describe(&detail), &start, &end, &resolved.path));
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::{messages, paths, run};
    use crate::rule::RuleAction;
    use crate::schema::validate_options;
    use std::collections::BTreeMap;

    const GLITTER: &str = "
glitter:
  sparkles: lots
  shiny: 1000
";

    fn check(properties: &str) -> Vec<RuleFunctionResult> {
        run(
            &XorFunctionImpl,
            GLITTER,
            "$.glitter",
            RuleAction::function("xor").with_option("properties", properties),
        )
    }

    fn validation_errors(properties: &str) -> usize {
        let raw = BTreeMap::from([("properties".to_string(), properties.to_string())]);
        validate_options(&XorFunctionImpl.schema(), &raw).map_or_else(|e| e.len(), |_| 0)
    }

    #[test]
    fn test_schema() {
        let schema = XorFunctionImpl.schema();
        assert_eq!(schema.name, "xor");
        assert_eq!(schema.required, vec!["properties"]);
    }

    #[test]
    fn test_exactly_one_present() {
        assert!(check("sparkles, rainbows").is_empty());
    }

    #[test]
    fn test_both_present() {
        let results = check("sparkles, shiny");
        assert_eq!(
            messages(&results),
            vec!["Test rule: 'sparkles' and 'shiny' must not both be defined"]
        );
        assert_eq!(paths(&results), vec!["$.glitter"]);
    }

    #[test]
    fn test_neither_present() {
        let results = check("clouds, rain");
        assert_eq!(
            messages(&results),
            vec!["Test rule: 'clouds' or 'rain' must be defined"]
        );
    }

    #[test]
    fn test_no_nodes_no_findings() {
        let results = run(
            &XorFunctionImpl,
            GLITTER,
            "$.missing",
            RuleAction::function("xor").with_option("properties", "a, b"),
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_each_node_checked() {
        let results = run(
            &XorFunctionImpl,
            "examples:\n  one:\n    value: 1\n  two:\n    summary: none\n  three:\n    value: 1\n    externalValue: x\n",
            "$.examples.*",
            RuleAction::function("xor").with_option("properties", "value, externalValue"),
        );
        assert_eq!(paths(&results), vec!["$.examples.two", "$.examples.three"]);
    }

    #[test]
    fn test_options_validation() {
        assert_eq!(validation_errors(""), 1);
        assert_eq!(validation_errors("notenough"), 1);
        assert_eq!(validation_errors("chip, chop, chap"), 1);
        assert_eq!(validation_errors("chip, chop"), 0);
    }
}
