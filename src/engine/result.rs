//! Result aggregation and reporting.
//!
//! Collects validation results in insertion order, answers severity-range
//! and subject queries, and supports comparison against a baseline run.

use std::collections::HashMap;

use super::validator::Subject;
use crate::graph::EntityId;
use crate::severity::{self, OrderedScale, Severity};
use crate::types::TypeName;

/// Whether a target passed its rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Passed,
    Failed,
}

/// One target's outcome. Immutable once appended to a [`ResultLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Position of the target in discovery order
    pub sequence: usize,
    pub subject: Subject,
    pub severity: Severity,
    pub outcome: Outcome,
    pub message: String,
    /// Marker kind the target was discovered through
    pub marker: TypeName,
    /// Validator type that produced the outcome, if one was resolved
    pub validator: Option<TypeName>,
}

impl ValidationResult {
    pub fn passed(
        sequence: usize,
        subject: Subject,
        marker: TypeName,
        validator: Option<TypeName>,
    ) -> Self {
        ValidationResult {
            sequence,
            subject,
            severity: Severity::Info,
            outcome: Outcome::Passed,
            message: "passed".to_string(),
            marker,
            validator,
        }
    }

    pub fn failed(
        sequence: usize,
        subject: Subject,
        severity: Severity,
        message: impl Into<String>,
        marker: TypeName,
        validator: Option<TypeName>,
    ) -> Self {
        ValidationResult {
            sequence,
            subject,
            severity,
            outcome: Outcome::Failed,
            message: message.into(),
            marker,
            validator,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.outcome == Outcome::Failed
    }
}

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSummary {
    pub passed: u32,
    pub failed: u32,
    pub info: u32,
    pub warnings: u32,
    pub errors: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

/// Baseline comparison result, keyed by subject and marker kind.
#[derive(Debug, Clone, Default)]
pub struct ComparisonResult {
    pub new_failures: Vec<String>,
    pub resolved: Vec<String>,
    pub regressions: Vec<String>,
    pub unchanged: Vec<String>,
}

/// Append-only, insertion-ordered collection of results.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    results: Vec<ValidationResult>,
    total_duration_ms: u64,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, result: ValidationResult) {
        self.results.push(result);
    }

    pub fn set_duration(&mut self, total_duration_ms: u64) {
        self.total_duration_ms = total_duration_ms;
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationResult> {
        self.results.iter()
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    /// Results whose severity lies in `min..=max`, in insertion order.
    pub fn query(&self, min: Severity, max: Severity) -> impl Iterator<Item = &ValidationResult> + '_ {
        let allowed: Vec<Severity> = severity::all_between(min, max).collect();
        self.results
            .iter()
            .filter(move |r| allowed.contains(&r.severity))
    }

    /// Results at `min` or above.
    pub fn at_least(&self, min: Severity) -> impl Iterator<Item = &ValidationResult> + '_ {
        let allowed: Vec<Severity> = severity::all_greater_or_equal(min).collect();
        self.results
            .iter()
            .filter(move |r| allowed.contains(&r.severity))
    }

    pub fn for_subject<'a>(
        &'a self,
        subject: &'a Subject,
    ) -> impl Iterator<Item = &'a ValidationResult> + 'a {
        self.results.iter().filter(move |r| &r.subject == subject)
    }

    /// Results whose subject lives on `entity`.
    pub fn for_entity(&self, entity: EntityId) -> impl Iterator<Item = &ValidationResult> + '_ {
        self.results
            .iter()
            .filter(move |r| r.subject.entity() == Some(entity))
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> + '_ {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Check if there are failures at `severity` or above
    pub fn has_failures_at(&self, severity: Severity) -> bool {
        self.failures().any(|r| r.severity >= severity)
    }

    pub fn highest_severity(&self) -> Option<Severity> {
        self.failures().map(|r| r.severity).max()
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary {
            total_duration_ms: self.total_duration_ms,
            ..ResultSummary::default()
        };

        for result in &self.results {
            summary.total += 1;

            match result.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed => summary.failed += 1,
            }

            match result.severity {
                Severity::Info => summary.info += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Error => summary.errors += 1,
            }
        }

        summary
    }

    /// Number of results at each severity, in scale order.
    pub fn counts_by_severity(&self) -> Vec<(Severity, usize)> {
        Severity::MEMBERS
            .iter()
            .map(|&s| (s, self.results.iter().filter(|r| r.severity == s).count()))
            .collect()
    }

    /// Compare against a baseline log
    pub fn compare_to_baseline(&self, baseline: &ResultLog) -> ComparisonResult {
        let mut result = ComparisonResult::default();

        let baseline_outcomes: HashMap<(&Subject, &TypeName), Outcome> = baseline
            .results
            .iter()
            .map(|r| ((&r.subject, &r.marker), r.outcome))
            .collect();

        for current in &self.results {
            let key = format!("{} {}", current.subject, current.marker);
            let previous = baseline_outcomes.get(&(&current.subject, &current.marker));

            match (previous, current.outcome) {
                (Some(Outcome::Passed), Outcome::Failed) => result.regressions.push(key),
                (Some(Outcome::Failed), Outcome::Passed) => result.resolved.push(key),
                (None, Outcome::Failed) => result.new_failures.push(key),
                _ => result.unchanged.push(key),
            }
        }

        result
    }
}

impl Extend<ValidationResult> for ResultLog {
    fn extend<I: IntoIterator<Item = ValidationResult>>(&mut self, iter: I) {
        self.results.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ResultLog {
    type Item = &'a ValidationResult;
    type IntoIter = std::slice::Iter<'a, ValidationResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
