//! Efficiency score, readiness verdict and critical issue detection.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::evaluation::metrics::{Metric, MetricSet};
use crate::models::{SuiteOutcome, SuiteResults};

/// Fixed metric weights; they sum to 1.0.
pub const METRIC_WEIGHTS: [(Metric, f64); 6] = [
    (Metric::SystemReliability, 0.25),
    (Metric::PerformanceScore, 0.20),
    (Metric::UsabilityScore, 0.20),
    (Metric::WorkflowEfficiency, 0.15),
    (Metric::RagEffectiveness, 0.10),
    (Metric::ErrorResilience, 0.10),
];

/// Minimum score for a passing run.
pub const PASSING_SCORE: f64 = 70.0;

/// Weighted efficiency score in [0,100], rounded to one decimal.
///
/// Only measured metrics take part, and the weights are renormalized over them,
/// so suites that never ran do not drag the score down.
pub fn efficiency_score(metrics: &MetricSet) -> f64 {
    let (weighted, total_weight) = METRIC_WEIGHTS
        .iter()
        .filter_map(|(metric, weight)| metrics.get(*metric).map(|v| (v * weight, *weight)))
        .fold((0.0, 0.0), |(sum, total), (v, w)| (sum + v, total + w));

    if total_weight <= 0.0 {
        return 0.0;
    }

    let score = (weighted / total_weight * 100.0).clamp(0.0, 100.0);
    (score * 10.0).round() / 10.0
}

/// Four-level readiness verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Readiness {
    #[serde(rename = "Not Ready")]
    NotReady,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    #[serde(rename = "Ready with Minor Issues")]
    ReadyWithMinorIssues,
    #[serde(rename = "Production Ready")]
    ProductionReady,
}

impl Readiness {
    /// Classify a score and critical-issue count; the first matching rule wins.
    pub fn classify(score: f64, critical_issues: usize) -> Self {
        if score >= 85.0 && critical_issues == 0 {
            Readiness::ProductionReady
        } else if score >= 70.0 && critical_issues <= 2 {
            Readiness::ReadyWithMinorIssues
        } else if score >= 50.0 {
            Readiness::NeedsImprovement
        } else {
            Readiness::NotReady
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Readiness::NotReady => "Not Ready",
            Readiness::NeedsImprovement => "Needs Improvement",
            Readiness::ReadyWithMinorIssues => "Ready with Minor Issues",
            Readiness::ProductionReady => "Production Ready",
        }
    }
}

impl Display for Readiness {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a run passes the efficiency evaluation.
pub fn passes(score: f64, critical_issues: usize) -> bool {
    score >= PASSING_SCORE && critical_issues == 0
}

/// Conditions that block effectiveness, in a fixed order.
///
/// Unmeasured metrics are treated as failing their threshold.
pub fn critical_issues(results: &SuiteResults, metrics: &MetricSet) -> Vec<String> {
    let mut issues = Vec::new();

    match &results.core {
        Some(SuiteOutcome::Crashed { error }) => {
            issues.push(format!("Core system failure: {}", error));
        }
        Some(SuiteOutcome::Completed { report }) => {
            if report.summary.success_rate.map_or(true, |r| r < 0.5) {
                issues.push("Core system reliability below 50%".to_string());
            }
        }
        Some(SuiteOutcome::Unavailable { .. }) | None => {}
    }

    if metrics.below(Metric::PerformanceScore, 0.3) {
        issues.push("Severe performance issues detected".to_string());
    }
    if metrics.below(Metric::UsabilityScore, 0.4) {
        issues.push("Critical usability problems".to_string());
    }
    if metrics.below(Metric::WorkflowEfficiency, 0.5) {
        issues.push("Workflow completion rate below 50%".to_string());
    }

    issues
}
