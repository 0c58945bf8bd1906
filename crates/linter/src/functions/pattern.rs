use super::{span, target};
use crate::path::ResolvedNode;
use crate::results::RuleFunctionResult;
use crate::schema::{OptionKind, OptionProperty, RuleFunctionSchema};
use crate::traits::{RuleFunction, RuleFunctionContext};

/// Scalar values must match `match` and must not match `notMatch`.
///
/// Non-scalar values are skipped. With neither option set the function
/// reports nothing.
pub struct PatternFunctionImpl;

impl RuleFunction for PatternFunctionImpl {
    fn schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema {
            name: "pattern",
            required: vec![],
            properties: vec![
                OptionProperty {
                    name: "match",
                    kind: OptionKind::Pattern,
                },
                OptionProperty {
                    name: "notMatch",
                    kind: OptionKind::Pattern,
                },
            ],
        }
    }

    fn run_rule(
        &self,
        nodes: &[ResolvedNode],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let must_match = context.options.pattern("match");
        let must_not_match = context.options.pattern("notMatch");
        let mut results = Vec::new();

        for value in nodes.iter().filter_map(|node| target(node, context.field())) {
            if !value.node.is_scalar() {
                continue;
            }
            let text = value.node.value.as_str();
            let (start, end) = span(&value.node);

            if let Some(regex) = must_match {
                if !regex.is_match(text) {
                    let detail = format!("'{text}' does not match the expression '{}'", regex.as_str());
                    results.push(context.result(context.describe(&detail), &start, &end, &value.path));
                }
            }
            if let Some(regex) = must_not_match {
                if regex.is_match(text) {
                    let detail = format!("matches the expression '{}'", regex.as_str());
                    results.push(context.result(context.describe(&detail), &start, &end, &value.path));
                }
            }
        }
        results
    }
}
