use crate::path::ResolvedNode;
use crate::results::RuleFunctionResult;
use crate::rule::Rule;
use crate::schema::{RuleFunctionSchema, RuleOptions};
use oaslint_index::{DocumentIndex, NodeRef};
use std::sync::Arc;

/// Read-only bundle handed to a rule function for one invocation.
///
/// `options` have already been validated against the function's schema.
#[derive(Debug, Clone, Copy)]
pub struct RuleFunctionContext<'a> {
    pub options: &'a RuleOptions,
    pub rule: &'a Arc<Rule>,
    pub index: &'a DocumentIndex,
}

impl<'a> RuleFunctionContext<'a> {
    #[must_use]
    pub const fn new(options: &'a RuleOptions, rule: &'a Arc<Rule>, index: &'a DocumentIndex) -> Self {
        Self {
            options,
            rule,
            index,
        }
    }

    /// The `then.field` of the owning rule, if any.
    #[must_use]
    pub fn field(&self) -> Option<&'a str> {
        self.rule.then.field.as_deref()
    }

    /// Build a finding attributed to the owning rule.
    #[must_use]
    pub fn result(
        &self,
        message: impl Into<String>,
        start: &NodeRef,
        end: &NodeRef,
        path: impl Into<String>,
    ) -> RuleFunctionResult {
        RuleFunctionResult::new(message, start, end, path, self.rule)
    }

    /// Prefix `detail` with the rule description.
    #[must_use]
    pub fn describe(&self, detail: &str) -> String {
        format!("{}: {detail}", self.rule.description)
    }
}

/// A pluggable check.
///
/// Implementations declare the options they accept and inspect resolved
/// nodes without modifying the document; they are shared across rule
/// workers, hence `Send + Sync`.
pub trait RuleFunction: Send + Sync {
    /// Options schema; also carries the function's name.
    fn schema(&self) -> RuleFunctionSchema;

    /// Check the nodes matched by the rule's `given` path.
    ///
    /// `nodes` may be empty; whether that is a violation is up to the function.
    fn run_rule(
        &self,
        nodes: &[ResolvedNode],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult>;
}
