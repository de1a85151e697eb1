//! The efficiency report and its sections.

use serde::{Deserialize, Serialize};

use crate::evaluation::benchmarks::BenchmarkComparison;
use crate::evaluation::metrics::MetricSet;
use crate::evaluation::performance::PerformanceAnalysis;
use crate::evaluation::recommendations::RecommendationPlan;
use crate::evaluation::risk::RiskAssessment;
use crate::evaluation::scoring::{self, Readiness};
use crate::models::{SuiteId, SuiteStatus};

/// Report format version.
pub const REPORT_VERSION: &str = "1.0.0";

/// Session metadata. The only part of a report that varies between identical runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Session start formatted as `%Y%m%d_%H%M%S`; also names the artifacts.
    pub test_session_id: String,
    /// Session start (RFC 3339 format).
    pub timestamp: String,
    /// Seconds from session start to report assembly.
    pub duration: f64,
    pub test_suites_run: Vec<SuiteId>,
    pub version: String,
}

/// Headline verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    /// Weighted efficiency score (0 to 100).
    pub overall_efficiency_score: f64,
    pub system_readiness: Readiness,
    pub critical_issues: Vec<String>,
    pub top_recommendations: Vec<String>,
}

/// How each suite fared in this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteStatusEntry {
    pub suite: SuiteId,
    pub status: SuiteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// The terminal artifact of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub meta: SessionMeta,
    pub executive_summary: ExecutiveSummary,
    pub detailed_metrics: MetricSet,
    pub performance_analysis: PerformanceAnalysis,
    pub risk_assessment: RiskAssessment,
    pub recommendations: RecommendationPlan,
    pub benchmarks: BenchmarkComparison,
    /// Raw suite data is saved beside the report in `<suite>_results_<id>.json`.
    pub suite_status: Vec<SuiteStatusEntry>,
}

impl EfficiencyReport {
    pub fn score(&self) -> f64 {
        self.executive_summary.overall_efficiency_score
    }

    pub fn readiness(&self) -> Readiness {
        self.executive_summary.system_readiness
    }

    pub fn critical_issues(&self) -> &[String] {
        &self.executive_summary.critical_issues
    }

    /// Whether the evaluated system passes: score of at least 70 and no critical issues.
    pub fn passes(&self) -> bool {
        scoring::passes(self.score(), self.critical_issues().len())
    }
}
