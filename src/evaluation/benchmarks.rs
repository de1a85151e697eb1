//! Comparison of the normalized metrics against fixed targets.

use serde::{Deserialize, Serialize};

use crate::evaluation::metrics::{Metric, MetricSet};
use crate::utils::{format_optional_percent, format_seconds, NOT_MEASURED};

/// Reliability must exceed this fraction.
pub const RELIABILITY_TARGET: f64 = 0.95;
/// Usability must exceed this fraction.
pub const USABILITY_TARGET: f64 = 0.80;
/// Workflow efficiency must exceed this fraction.
pub const WORKFLOW_EFFICIENCY_TARGET: f64 = 0.85;
/// Average command response time must stay below this many seconds.
pub const RESPONSE_TIME_TARGET_SECS: f64 = 2.0;

/// Target values, as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryStandards {
    pub response_time_target: String,
    pub reliability_target: String,
    pub usability_target: String,
    pub workflow_efficiency_target: String,
}

impl Default for IndustryStandards {
    fn default() -> Self {
        Self {
            response_time_target: format!("< {:.1}s", RESPONSE_TIME_TARGET_SECS),
            reliability_target: format!("> {:.0}%", RELIABILITY_TARGET * 100.0),
            usability_target: format!("> {:.0}%", USABILITY_TARGET * 100.0),
            workflow_efficiency_target: format!("> {:.0}%", WORKFLOW_EFFICIENCY_TARGET * 100.0),
        }
    }
}

/// Current values, as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPerformance {
    pub reliability: String,
    pub usability: String,
    pub workflow_efficiency: String,
    pub performance: String,
    pub response_time: String,
}

/// Targets, current values and the gaps between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub industry_standards: IndustryStandards,
    pub current_performance: CurrentPerformance,
    /// One entry per measured metric that misses its target.
    pub gaps: Vec<String>,
}

/// Compare metrics against the targets.
///
/// `response_time` is the raw average command response time in seconds, if measured.
pub fn compare_benchmarks(metrics: &MetricSet, response_time: Option<f64>) -> BenchmarkComparison {
    let current_performance = CurrentPerformance {
        reliability: format_optional_percent(metrics.system_reliability),
        usability: format_optional_percent(metrics.usability_score),
        workflow_efficiency: format_optional_percent(metrics.workflow_efficiency),
        performance: format_optional_percent(metrics.performance_score),
        response_time: response_time
            .map(format_seconds)
            .unwrap_or_else(|| NOT_MEASURED.to_string()),
    };

    let mut gaps = Vec::new();
    let fraction_targets = [
        (Metric::SystemReliability, RELIABILITY_TARGET, "Reliability"),
        (Metric::UsabilityScore, USABILITY_TARGET, "Usability"),
        (
            Metric::WorkflowEfficiency,
            WORKFLOW_EFFICIENCY_TARGET,
            "Workflow efficiency",
        ),
    ];
    for (metric, target, label) in fraction_targets {
        if let Some(gap) = shortfall(metrics.get(metric), target) {
            gaps.push(format!("{} gap: {:.1}%", label, gap * 100.0));
        }
    }

    if let Some(seconds) = response_time.filter(|t| *t >= RESPONSE_TIME_TARGET_SECS) {
        gaps.push(format!(
            "Response time gap: {} over target",
            format_seconds(seconds - RESPONSE_TIME_TARGET_SECS)
        ));
    }

    BenchmarkComparison {
        industry_standards: IndustryStandards::default(),
        current_performance,
        gaps,
    }
}

fn shortfall(value: Option<f64>, target: f64) -> Option<f64> {
    value.filter(|v| *v < target).map(|v| target - v)
}
