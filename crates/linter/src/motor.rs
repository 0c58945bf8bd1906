//! Applies a ruleset to a document.
//!
//! A run happens in two phases. Planning looks up each rule's function,
//! compiles its `given` path and validates its options; a rule that fails
//! any of these becomes a single configuration finding and its function
//! never runs. Execution then evaluates every planned rule, on a worker
//! pool when enabled, and merges results back in rule id order.

use crate::error::Result;
use crate::path::JsonPath;
use crate::registry::FunctionRegistry;
use crate::results::{RuleFunctionResult, RuleResultSet, SpecInfo};
use crate::rule::{Rule, RuleSet};
use crate::schema::{validate_options, RuleOptions};
use crate::traits::{RuleFunction, RuleFunctionContext};
use crossbeam_channel::unbounded;
use oaslint_index::DocumentIndex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use threadpool::ThreadPool;

/// How rules are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Evaluate rules on a worker pool
    pub parallel: bool,
    /// Pool size; 0 uses the available parallelism of the host
    pub workers: usize,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: 0,
        }
    }
}

impl MotorConfig {
    /// Run every rule on the calling thread.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            workers: 1,
        }
    }

    fn worker_count(&self, tasks: usize) -> usize {
        let available = if self.workers == 0 {
            std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
        } else {
            self.workers
        };
        available.min(tasks).max(1)
    }
}

/// A rule ready to run, or the reasons it cannot.
enum PlannedRule {
    Run {
        rule: Arc<Rule>,
        function: Arc<dyn RuleFunction>,
        path: JsonPath,
        options: RuleOptions,
    },
    Misconfigured {
        rule: Arc<Rule>,
        defects: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct Motor {
    registry: FunctionRegistry,
    config: MotorConfig,
}

impl Default for Motor {
    fn default() -> Self {
        Self::builtin(MotorConfig::default())
    }
}

impl Motor {
    #[must_use]
    pub fn new(registry: FunctionRegistry, config: MotorConfig) -> Self {
        Self { registry, config }
    }

    /// A motor over the built-in functions.
    #[must_use]
    pub fn builtin(config: MotorConfig) -> Self {
        Self::new(FunctionRegistry::builtin().clone(), config)
    }

    #[must_use]
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    /// Apply every rule in `rule_set` to `document`.
    ///
    /// Fails only when the document cannot be parsed, in which case no rule
    /// runs. Otherwise every rule contributes its findings, or one
    /// configuration finding when it cannot run. Results are grouped by rule
    /// id, each group in the order its function emitted them.
    #[tracing::instrument(skip_all, fields(rules = rule_set.len(), size = document.len()))]
    pub fn apply_rules(&self, rule_set: &RuleSet, document: &[u8]) -> Result<Vec<RuleFunctionResult>> {
        let index = Arc::new(DocumentIndex::parse(document)?);
        let plans: Vec<PlannedRule> = rule_set.rules.values().map(|rule| self.plan(rule)).collect();

        let results = if self.config.parallel && plans.len() > 1 {
            self.run_parallel(plans, &index)
        } else {
            plans
                .iter()
                .flat_map(|plan| execute(plan, &index))
                .collect()
        };

        tracing::debug!(results = results.len(), "Rules applied");
        Ok(results)
    }

    /// Apply rules and prepare the findings for reporting.
    pub fn lint(&self, rule_set: &RuleSet, spec: &SpecInfo) -> Result<RuleResultSet> {
        let results = self.apply_rules(rule_set, &spec.spec_bytes)?;
        let mut result_set = RuleResultSet::new(results);
        result_set.prepare_for_serialization(spec);
        Ok(result_set)
    }

    fn plan(&self, rule: &Arc<Rule>) -> PlannedRule {
        let mut defects = Vec::new();

        let function = self.registry.get(&rule.then.function);
        if function.is_none() {
            defects.push(format!("unknown function '{}'", rule.then.function));
        }

        let path = JsonPath::parse(&rule.given)
            .map_err(|err| defects.push(err.to_string()))
            .ok();

        let options = match function {
            Some(function) => validate_options(&function.schema(), &rule.then.function_options)
                .map_err(|errors| defects.extend(errors.iter().map(ToString::to_string)))
                .ok(),
            None => None,
        };

        match (function, path, options) {
            (Some(function), Some(path), Some(options)) if defects.is_empty() => {
                tracing::debug!(
                    rule = %rule.id,
                    function = %rule.then.function,
                    severity = %rule.severity,
                    "Rule planned"
                );
                PlannedRule::Run {
                    rule: Arc::clone(rule),
                    function: Arc::clone(function),
                    path,
                    options,
                }
            }
            _ => {
                tracing::warn!(rule = %rule.id, ?defects, "Rule is misconfigured");
                PlannedRule::Misconfigured {
                    rule: Arc::clone(rule),
                    defects,
                }
            }
        }
    }

    fn run_parallel(&self, plans: Vec<PlannedRule>, index: &Arc<DocumentIndex>) -> Vec<RuleFunctionResult> {
        let count = plans.len();
        let pool = ThreadPool::new(self.config.worker_count(count));
        let (sender, receiver) = unbounded();

        for (position, plan) in plans.into_iter().enumerate() {
            let sender = sender.clone();
            let index = Arc::clone(index);
            pool.execute(move || {
                let results = execute(&plan, &index);
                let _ = sender.send((position, results));
            });
        }
        drop(sender);

        let mut slots: Vec<Option<Vec<RuleFunctionResult>>> = (0..count).map(|_| None).collect();
        for (position, results) in &receiver {
            slots[position] = Some(results);
        }
        slots.into_iter().flatten().flatten().collect()
    }
}

/// Apply `rule_set` to `document` with the built-in functions and the
/// default configuration.
pub fn apply_rules(rule_set: &RuleSet, document: &[u8]) -> Result<Vec<RuleFunctionResult>> {
    Motor::builtin(MotorConfig::default()).apply_rules(rule_set, document)
}

fn execute(plan: &PlannedRule, index: &DocumentIndex) -> Vec<RuleFunctionResult> {
    match plan {
        PlannedRule::Misconfigured { rule, defects } => {
            vec![configuration_finding(rule, index, &defects.join("; "))]
        }
        PlannedRule::Run {
            rule,
            function,
            path,
            options,
        } => {
            let nodes = path.resolve(index);
            let context = RuleFunctionContext::new(options, rule, index);
            match catch_unwind(AssertUnwindSafe(|| function.run_rule(&nodes, &context))) {
                Ok(results) => {
                    tracing::debug!(
                        rule = %rule.id,
                        nodes = nodes.len(),
                        findings = results.len(),
                        "Rule evaluated"
                    );
                    results
                }
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    tracing::warn!(rule = %rule.id, %reason, "Rule function panicked");
                    let detail = format!("function '{}' panicked: {reason}", rule.then.function);
                    vec![configuration_finding(rule, index, &detail)]
                }
            }
        }
    }
}

/// A finding standing in for a rule that could not be evaluated, anchored at
/// the document root.
fn configuration_finding(rule: &Arc<Rule>, index: &DocumentIndex, detail: &str) -> RuleFunctionResult {
    let root = index.root_node();
    RuleFunctionResult::new(
        format!("Rule '{}' is misconfigured: {detail}", rule.id),
        root,
        root,
        rule.given.clone(),
        rule,
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
