use super::span;
use crate::path::ResolvedNode;
use crate::results::RuleFunctionResult;
use crate::schema::RuleFunctionSchema;
use crate::traits::{RuleFunction, RuleFunctionContext};
use oaslint_index::Node;

/// The rule's `field` must be present on each node and hold a truthy value.
///
/// Without a `field`, the resolved node itself must be truthy.
pub struct TruthyFunctionImpl;

fn is_truthy(node: &Node) -> bool {
    if node.is_scalar() {
        !node.is_null() && !matches!(node.value.as_str(), "false" | "False" | "FALSE")
    } else {
        !node.content.is_empty()
    }
}

impl RuleFunction for TruthyFunctionImpl {
    fn schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema::named("truthy")
    }

    fn run_rule(
        &self,
        nodes: &[ResolvedNode],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let field = context.field();
        let mut results = Vec::new();

        for resolved in nodes {
            let value = match field {
                Some(field) => resolved.node.get(field),
                None => Some(&resolved.node),
            };
            if value.is_some_and(|value| is_truthy(value)) {
                continue;
            }

            let subject = field.unwrap_or_else(|| resolved.path.as_str());
            let (start, end) = span(&resolved.node);
            results.push(context.result(
                context.describe(&format!("'{subject}' must be set")),
                &start,
                &end,
                &resolved.path,
            ));
        }
        results
    }
}
