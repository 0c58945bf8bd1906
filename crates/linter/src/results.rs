//! Findings produced by rule functions, and their serialization-ready form.

use crate::rule::Rule;
use oaslint_index::NodeRef;
use oaslint_types::{Position, Range, RuleCategory, RuleSeverity};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// A raw finding, as emitted by a rule function.
///
/// Carries node positions and a back-reference to the rule; the range,
/// severity and category shown to users are derived later by
/// [`RuleResultSet::prepare_for_serialization`].
#[derive(Debug, Clone)]
pub struct RuleFunctionResult {
    pub message: String,
    pub start_node: NodeRef,
    pub end_node: NodeRef,
    /// Concrete path of the offending node, e.g. `$.servers[1].url`
    pub path: String,
    pub rule: Arc<Rule>,
}

impl RuleFunctionResult {
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        start: &NodeRef,
        end: &NodeRef,
        path: impl Into<String>,
        rule: &Arc<Rule>,
    ) -> Self {
        Self {
            message: message.into(),
            start_node: Arc::clone(start),
            end_node: Arc::clone(end),
            path: path.into(),
            rule: Arc::clone(rule),
        }
    }
}

/// Metadata about the linted document needed to finalize results.
#[derive(Debug, Clone, Default)]
pub struct SpecInfo {
    pub spec_bytes: Arc<[u8]>,
    /// Where the document came from, for reports
    pub file_name: Option<String>,
}

impl SpecInfo {
    #[must_use]
    pub fn new(spec_bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            spec_bytes: spec_bytes.into(),
            file_name: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Character count of every line, in order.
    fn line_widths(&self) -> Vec<u32> {
        String::from_utf8_lossy(&self.spec_bytes)
            .lines()
            .map(|line| u32::try_from(line.chars().count()).unwrap_or(u32::MAX))
            .collect()
    }
}

/// A finding enriched with its resolved range, rule id, severity and category.
#[derive(Debug, Clone)]
pub struct RuleResult {
    pub finding: RuleFunctionResult,
    pub range: Option<Range>,
    pub rule_id: Option<String>,
    pub rule_severity: Option<RuleSeverity>,
    pub rule_category: Option<RuleCategory>,
}

impl RuleResult {
    fn unprepared(finding: RuleFunctionResult) -> Self {
        Self {
            finding,
            range: None,
            rule_id: None,
            rule_severity: None,
            rule_category: None,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.finding.message
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.finding.path
    }

    /// Severity of the rule that produced this finding.
    #[must_use]
    pub fn severity(&self) -> RuleSeverity {
        self.rule_severity.unwrap_or(self.finding.rule.severity)
    }

    /// Range of the finding, derived on demand if not yet prepared.
    #[must_use]
    pub fn range(&self) -> Range {
        self.range.unwrap_or_else(|| derive_range(&self.finding, &[]))
    }
}

/// Range from a finding's start and end nodes.
///
/// A zero-width range on a line that exists in the source is widened to the
/// end of that line. Zero coordinates are raised to 1; all other positions,
/// however large, are taken as they are.
fn derive_range(finding: &RuleFunctionResult, line_widths: &[u32]) -> Range {
    let mut range = Range::new(
        Position::clamped(finding.start_node.line, finding.start_node.column),
        Position::clamped(finding.end_node.line, finding.end_node.column),
    );

    if range.is_empty() {
        let width = usize::try_from(range.end.line)
            .ok()
            .and_then(|line| line.checked_sub(1))
            .and_then(|index| line_widths.get(index));
        if let Some(&width) = width {
            range.end.column = range.end.column.max(width);
        }
    }
    range
}

impl Serialize for RuleResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Shape<'a> {
            message: &'a str,
            path: &'a str,
            range: Range,
            rule_id: &'a str,
            rule_severity: RuleSeverity,
            rule_category: RuleCategory,
        }

        Shape {
            message: &self.finding.message,
            path: &self.finding.path,
            range: self.range(),
            rule_id: self.rule_id.as_deref().unwrap_or(&self.finding.rule.id),
            rule_severity: self.severity(),
            rule_category: self.rule_category.unwrap_or(self.finding.rule.category),
        }
        .serialize(serializer)
    }
}

/// The outcome of a lint run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleResultSet {
    pub results: Vec<RuleResult>,
}

impl RuleResultSet {
    /// Store findings as they are, unranked and without derived fields.
    #[must_use]
    pub fn new(results: Vec<RuleFunctionResult>) -> Self {
        Self {
            results: results.into_iter().map(RuleResult::unprepared).collect(),
        }
    }

    /// Fill range, rule id, severity and category on every result.
    ///
    /// Order preserving and repeatable: every field is recomputed from the
    /// underlying finding, so calling this twice changes nothing.
    pub fn prepare_for_serialization(&mut self, spec: &SpecInfo) {
        let line_widths = spec.line_widths();
        for result in &mut self.results {
            let rule = &result.finding.rule;
            result.range = Some(derive_range(&result.finding, &line_widths));
            result.rule_id = Some(rule.id.clone());
            result.rule_severity = Some(rule.severity);
            result.rule_category = Some(rule.category);
        }
        tracing::debug!(
            results = self.results.len(),
            file = spec.file_name.as_deref().unwrap_or("<memory>"),
            "Results prepared for serialization"
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn count(&self, severity: RuleSeverity) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity() == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.results.iter().filter(|r| r.severity().is_error()).count()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(RuleSeverity::Warn)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count(RuleSeverity::Info)
    }

    #[must_use]
    pub fn hint_count(&self) -> usize {
        self.count(RuleSeverity::Hint)
    }

    /// Results whose rule belongs to `category`.
    #[must_use]
    pub fn results_for_category(&self, category: RuleCategory) -> Vec<&RuleResult> {
        self.results
            .iter()
            .filter(|r| r.finding.rule.category == category)
            .collect()
    }

    /// Results produced by the rule with `rule_id`.
    #[must_use]
    pub fn results_for_rule(&self, rule_id: &str) -> Vec<&RuleResult> {
        self.results
            .iter()
            .filter(|r| r.finding.rule.id == rule_id)
            .collect()
    }

    /// Reorder by start position. Stable, so findings on the same position
    /// keep their rule order.
    pub fn sort_by_line_number(&mut self) {
        self.results.sort_by_key(|result| result.range().start);
    }
}
