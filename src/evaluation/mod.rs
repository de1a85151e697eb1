//! Efficiency evaluation.
//!
//! Turns the partial, heterogeneous results of the measurement suites into one
//! report: normalized metrics, a weighted score, a readiness verdict, risks,
//! prioritized recommendations and benchmark gaps.

pub mod benchmarks;
pub mod metrics;
pub mod performance;
pub mod recommendations;
pub mod report;
pub mod risk;
pub mod scoring;
pub mod store;
pub mod types;

pub use metrics::{normalize, Metric, MetricSet};
pub use report::{format_report, OutputFormat};
pub use scoring::Readiness;
pub use store::{
    list_reports, load_report, load_suite_results, save_report, SavedArtifacts, StoreError,
};
pub use types::{EfficiencyReport, ExecutiveSummary, SessionMeta, SuiteStatusEntry};

use chrono::{DateTime, Local};
use log::debug;

use crate::models::{SuiteId, SuiteOutcome, SuiteResults};

use benchmarks::compare_benchmarks;
use metrics::core_response_time;
use performance::analyze_performance;
use recommendations::merge_recommendations;
use risk::assess_risks;
use scoring::{critical_issues, efficiency_score};

const TOP_RECOMMENDATIONS: usize = 3;

/// One evaluation session, identified by its start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    started_at: DateTime<Local>,
}

impl Session {
    /// Start a session now.
    pub fn start() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        Self { started_at }
    }

    /// Session id, also used to name the saved artifacts.
    pub fn id(&self) -> String {
        self.started_at.format("%Y%m%d_%H%M%S").to_string()
    }

    fn meta(&self, suites_run: Vec<SuiteId>) -> SessionMeta {
        let elapsed = Local::now().signed_duration_since(self.started_at);
        SessionMeta {
            test_session_id: self.id(),
            timestamp: self.started_at.to_rfc3339(),
            duration: (elapsed.num_milliseconds().max(0) as f64) / 1000.0,
            test_suites_run: suites_run,
            version: types::REPORT_VERSION.to_string(),
        }
    }
}

/// Composes every evaluation step into an [`EfficiencyReport`].
pub struct ReportAssembler {
    session: Session,
}

impl ReportAssembler {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Build the report for one set of suite results.
    ///
    /// Never fails: missing or failed suites only reduce what can be measured.
    pub fn assemble(&self, results: &SuiteResults) -> EfficiencyReport {
        let metrics = normalize(results);
        debug!(
            "Normalized {} of {} metrics",
            metrics.measured().count(),
            Metric::all().len()
        );

        let score = efficiency_score(&metrics);
        let issues = critical_issues(results, &metrics);
        let readiness = Readiness::classify(score, issues.len());
        debug!(
            "Score {:.1}, {} critical issue(s): {}",
            score,
            issues.len(),
            readiness
        );

        let risk_assessment = assess_risks(&metrics);
        let recommendations = merge_recommendations(&results.recommendations());
        let benchmarks = compare_benchmarks(
            &metrics,
            results.core_report().and_then(core_response_time),
        );
        let performance_analysis = analyze_performance(results.core_report());

        EfficiencyReport {
            meta: self.session.meta(results.suites_run()),
            executive_summary: ExecutiveSummary {
                overall_efficiency_score: score,
                system_readiness: readiness,
                critical_issues: issues,
                top_recommendations: recommendations.top(TOP_RECOMMENDATIONS),
            },
            detailed_metrics: metrics,
            performance_analysis,
            risk_assessment,
            recommendations,
            benchmarks,
            suite_status: suite_status(results),
        }
    }
}

fn suite_status(results: &SuiteResults) -> Vec<SuiteStatusEntry> {
    SuiteId::all()
        .iter()
        .map(|suite| {
            let detail = match suite {
                SuiteId::Core => results.core.as_ref().and_then(outcome_detail),
                SuiteId::RetrievalMemory => {
                    results.retrieval_memory.as_ref().and_then(outcome_detail)
                }
                SuiteId::UserExperience => {
                    results.user_experience.as_ref().and_then(outcome_detail)
                }
            };
            SuiteStatusEntry {
                suite: *suite,
                status: results.status(*suite),
                detail,
            }
        })
        .collect()
}

fn outcome_detail<T>(outcome: &SuiteOutcome<T>) -> Option<String> {
    match outcome {
        SuiteOutcome::Completed { .. } => None,
        SuiteOutcome::Unavailable { reason } => Some(reason.clone()),
        SuiteOutcome::Crashed { error } => Some(error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SuiteStatus;
    use crate::test_utils::{full_results, session};

    #[test]
    fn empty_results_produce_a_complete_report() {
        let report = ReportAssembler::new(session()).assemble(&SuiteResults::new());

        assert_eq!(report.score(), 0.0);
        assert_eq!(report.readiness(), Readiness::NotReady);
        assert!(!report.passes());
        assert!(report.meta.test_suites_run.is_empty());
        assert!(report
            .suite_status
            .iter()
            .all(|s| s.status == SuiteStatus::Skipped));
    }

    #[test]
    fn healthy_results_pass() {
        let report = ReportAssembler::new(session()).assemble(&full_results());

        assert!(report.score() >= 85.0, "score was {}", report.score());
        assert!(report.critical_issues().is_empty());
        assert_eq!(report.readiness(), Readiness::ProductionReady);
        assert!(report.passes());
        assert_eq!(report.meta.test_suites_run.len(), 3);
        assert_eq!(report.executive_summary.top_recommendations.len(), 3);
    }

    #[test]
    fn crash_detail_is_recorded() {
        let results = full_results().with_core(SuiteOutcome::Crashed {
            error: "timed out after 300s".to_string(),
        });
        let report = ReportAssembler::new(session()).assemble(&results);

        assert_eq!(
            report.suite_status[0],
            SuiteStatusEntry {
                suite: SuiteId::Core,
                status: SuiteStatus::Crashed,
                detail: Some("timed out after 300s".to_string()),
            }
        );
        assert_eq!(
            report.critical_issues()[0],
            "Core system failure: timed out after 300s"
        );
    }

    #[test]
    fn assembling_twice_is_identical_outside_meta() {
        let assembler = ReportAssembler::new(session());
        let results = full_results();

        let mut first = assembler.assemble(&results);
        let mut second = assembler.assemble(&results);
        first.meta.duration = 0.0;
        second.meta.duration = 0.0;

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn session_id_formats_start_time() {
        assert_eq!(session().id(), "20240102_030405");
    }
}
