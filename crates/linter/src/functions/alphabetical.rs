use super::{span, target};
use crate::path::ResolvedNode;
use crate::results::RuleFunctionResult;
use crate::schema::{OptionKind, OptionProperty, RuleFunctionSchema};
use crate::traits::{RuleFunction, RuleFunctionContext};
use oaslint_index::NodeRef;
use std::cmp::Ordering;

/// Sequence values must be in ascending order.
///
/// Elements are compared by their scalar value, or by the value of their
/// `keyedBy` property. Values that both read as numbers compare
/// numerically. Each out-of-order neighbour produces one finding.
pub struct AlphabeticalFunctionImpl;

fn compare(left: &str, right: &str) -> Ordering {
    match (left.parse::<f64>(), right.parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.cmp(right),
    }
}

fn sort_key<'n>(element: &'n NodeRef, keyed_by: Option<&str>) -> Option<&'n str> {
    match keyed_by {
        Some(key) => element
            .get(key)
            .filter(|value| value.is_scalar())
            .map(|value| value.value.as_str()),
        None => element.is_scalar().then_some(element.value.as_str()),
    }
}

impl RuleFunction for AlphabeticalFunctionImpl {
    fn schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema {
            name: "alphabetical",
            required: vec![],
            properties: vec![OptionProperty {
                name: "keyedBy",
                kind: OptionKind::Text,
            }],
        }
    }

    fn run_rule(
        &self,
        nodes: &[ResolvedNode],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let keyed_by = context.options.text("keyedBy");
        let mut results = Vec::new();

        for list in nodes.iter().filter_map(|node| target(node, context.field())) {
            if !list.node.is_sequence() {
                continue;
            }
            let keyed: Vec<(usize, &NodeRef, &str)> = list
                .node
                .content
                .iter()
                .enumerate()
                .filter_map(|(i, element)| sort_key(element, keyed_by).map(|key| (i, element, key)))
                .collect();

            for pair in keyed.windows(2) {
                let (_, _, previous) = pair[0];
                let (i, element, current) = pair[1];
                if compare(previous, current) != Ordering::Greater {
                    continue;
                }
                let detail = format!("'{current}' must be placed before '{previous}' (alphabetical)");
                let (start, end) = span(element);
                results.push(context.result(
                    context.describe(&detail),
                    &start,
                    &end,
                    format!("{}[{i}]", list.path),
                ));
            }
        }
        results
    }
}
