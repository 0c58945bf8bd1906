//! Built-in rule functions
//!
//! Each function lives in its own file and implements [`RuleFunction`]:
//! - `xor` - exactly one of two properties must be present
//! - `api_servers` - the document declares usable servers
//! - `truthy` - a property is present and not empty
//! - `pattern` - scalar values match (or avoid) a regular expression
//! - `alphabetical` - list values are in order
//!
//! [`RuleFunction`]: crate::traits::RuleFunction

use crate::path::ResolvedNode;
use oaslint_index::NodeRef;
use std::sync::Arc;

mod alphabetical;
mod api_servers;
mod pattern;
mod truthy;
mod xor;

pub use alphabetical::AlphabeticalFunctionImpl;
pub use api_servers::ApiServersFunctionImpl;
pub use pattern::PatternFunctionImpl;
pub use truthy::TruthyFunctionImpl;
pub use xor::XorFunctionImpl;

/// The value a function inspects for a resolved node: the node itself, or
/// its `field` property when the rule names one.
fn target(node: &ResolvedNode, field: Option<&str>) -> Option<ResolvedNode> {
    match field {
        None => Some(node.clone()),
        Some(field) => node.node.get(field).map(|value| node.child(field, value)),
    }
}

/// Start and end anchors spanning a whole node.
fn span(node: &NodeRef) -> (NodeRef, NodeRef) {
    (Arc::clone(node), node.last_child())
}
