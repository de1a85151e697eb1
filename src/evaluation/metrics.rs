//! Metric normalization across suite results.
//!
//! Every suite contributes to a fixed set of six cross-suite metrics. A metric
//! is `None` when no suite measured it; measured values are clamped into [0,1].

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::models::{CoreReport, SuiteResults, UxReport};

/// Baseline response time (seconds) at which the performance score reaches zero.
pub const RESPONSE_TIME_BASELINE_SECS: f64 = 3.0;

/// Record metric carrying a probe's average command response time.
pub const AVG_RESPONSE_TIME_METRIC: &str = "avg_command_response_time";
/// Record metric carrying a probe's workflow completion rate.
pub const COMPLETION_RATE_METRIC: &str = "completion_rate";
/// Record metric carrying a user-experience probe's usability score.
pub const USABILITY_SCORE_METRIC: &str = "usability_score";

const ERROR_HANDLING_PROBE: &str = "error handling";

/// The six normalized metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SystemReliability,
    PerformanceScore,
    UsabilityScore,
    WorkflowEfficiency,
    RagEffectiveness,
    ErrorResilience,
}

impl Metric {
    /// All metrics in display order.
    pub fn all() -> &'static [Metric] {
        &[
            Metric::SystemReliability,
            Metric::PerformanceScore,
            Metric::UsabilityScore,
            Metric::RagEffectiveness,
            Metric::WorkflowEfficiency,
            Metric::ErrorResilience,
        ]
    }

    pub fn key(&self) -> &'static str {
        match self {
            Metric::SystemReliability => "system_reliability",
            Metric::PerformanceScore => "performance_score",
            Metric::UsabilityScore => "usability_score",
            Metric::WorkflowEfficiency => "workflow_efficiency",
            Metric::RagEffectiveness => "rag_effectiveness",
            Metric::ErrorResilience => "error_resilience",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Metric::SystemReliability => "System Reliability",
            Metric::PerformanceScore => "Performance Score",
            Metric::UsabilityScore => "Usability Score",
            Metric::WorkflowEfficiency => "Workflow Efficiency",
            Metric::RagEffectiveness => "Rag Effectiveness",
            Metric::ErrorResilience => "Error Resilience",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Normalized metrics, each present only if some suite measured it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub system_reliability: Option<f64>,
    pub performance_score: Option<f64>,
    pub usability_score: Option<f64>,
    pub rag_effectiveness: Option<f64>,
    pub workflow_efficiency: Option<f64>,
    pub error_resilience: Option<f64>,
}

impl MetricSet {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::SystemReliability => self.system_reliability,
            Metric::PerformanceScore => self.performance_score,
            Metric::UsabilityScore => self.usability_score,
            Metric::WorkflowEfficiency => self.workflow_efficiency,
            Metric::RagEffectiveness => self.rag_effectiveness,
            Metric::ErrorResilience => self.error_resilience,
        }
    }

    /// Set a metric, clamping into [0,1]. Non-finite values leave it absent.
    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let value = value.and_then(unit_interval);
        match metric {
            Metric::SystemReliability => self.system_reliability = value,
            Metric::PerformanceScore => self.performance_score = value,
            Metric::UsabilityScore => self.usability_score = value,
            Metric::WorkflowEfficiency => self.workflow_efficiency = value,
            Metric::RagEffectiveness => self.rag_effectiveness = value,
            Metric::ErrorResilience => self.error_resilience = value,
        }
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.set(metric, Some(value));
        self
    }

    /// True when the metric is absent or measured strictly below `threshold`.
    pub fn below(&self, metric: Metric, threshold: f64) -> bool {
        self.get(metric).map_or(true, |v| v < threshold)
    }

    /// Measured metrics in display order.
    pub fn measured(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::all()
            .iter()
            .filter_map(move |m| self.get(*m).map(|v| (*m, v)))
    }
}

fn unit_interval(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

/// Derive the normalized metrics from whatever suites produced data.
///
/// Absent, unavailable or crashed suites leave their metrics absent; this never fails.
pub fn normalize(results: &SuiteResults) -> MetricSet {
    let mut metrics = MetricSet::default();

    if let Some(core) = results.core_report() {
        metrics.set(Metric::SystemReliability, core.summary.success_rate);
        metrics.set(
            Metric::PerformanceScore,
            core_response_time(core).map(performance_from_response_time),
        );
        metrics.set(Metric::WorkflowEfficiency, core_completion_rate(core));
    }

    if let Some(rag) = results.retrieval_report() {
        metrics.set(Metric::RagEffectiveness, rag.summary.avg_retrieval_accuracy);
    }

    if let Some(ux) = results.ux_report() {
        metrics.set(Metric::UsabilityScore, ux.summary.avg_usability_score);
        metrics.set(Metric::ErrorResilience, error_handling_score(ux));
    }

    metrics
}

/// Map a response time onto [0,1] against the fixed baseline.
pub fn performance_from_response_time(seconds: f64) -> f64 {
    (1.0 - seconds / RESPONSE_TIME_BASELINE_SECS).max(0.0)
}

/// Average command response time of the core suite, in seconds.
pub fn core_response_time(core: &CoreReport) -> Option<f64> {
    core.summary
        .avg_command_response_time
        .filter(|t| t.is_finite())
        .or_else(|| {
            core.records
                .iter()
                .rev()
                .find_map(|r| r.metric(AVG_RESPONSE_TIME_METRIC))
        })
}

// Only explicit completion rates count here; generic success rates measure a
// different quantity and are not mixed in.
fn core_completion_rate(core: &CoreReport) -> Option<f64> {
    if let Some(rate) = core.summary.workflow_completion_rate {
        return Some(rate);
    }

    let rates: Vec<f64> = core
        .records
        .iter()
        .filter_map(|r| r.metric(COMPLETION_RATE_METRIC))
        .collect();
    if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    }
}

fn error_handling_score(ux: &UxReport) -> Option<f64> {
    ux.records
        .iter()
        .find(|r| r.name.to_lowercase().contains(ERROR_HANDLING_PROBE))
        .and_then(|r| r.metric(USABILITY_SCORE_METRIC))
}
