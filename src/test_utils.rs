//! Shared test utilities for creating test fixtures.
//!
//! This module provides helper functions for creating suite reports and
//! results used across multiple test modules.

use chrono::{Local, TimeZone};

use crate::evaluation::metrics::{
    AVG_RESPONSE_TIME_METRIC, COMPLETION_RATE_METRIC, USABILITY_SCORE_METRIC,
};
use crate::evaluation::{Metric, MetricSet, Session};
use crate::models::{
    CoreReport, CoreSummary, MeasurementRecord, RecommendationGroup, Recommendations,
    RetrievalReport, RetrievalSummary, SuiteOutcome, SuiteResults, UxReport, UxSummary,
};

/// Create a core report with the given summary rates and one timed probe
pub fn core_report(success_rate: f64, avg_response_time: f64, completion_rate: f64) -> CoreReport {
    CoreReport {
        records: vec![
            MeasurementRecord::new("Core Commands", success_rate >= 0.5, 2.0)
                .with_metric(AVG_RESPONSE_TIME_METRIC, avg_response_time)
                .with_metric("max_command_response_time", avg_response_time * 2.0)
                .with_metric("commands_per_second", 4.0),
            MeasurementRecord::new("Project-Task Workflow", completion_rate >= 0.5, 3.5)
                .with_metric(COMPLETION_RATE_METRIC, completion_rate),
        ],
        summary: CoreSummary {
            total_tests: 2,
            passed_tests: 2,
            success_rate: Some(success_rate),
            total_duration: 5.5,
            avg_command_response_time: Some(avg_response_time),
            workflow_completion_rate: Some(completion_rate),
            error_rate: Some(1.0 - success_rate),
            user_satisfaction_score: None,
        },
        recommendations: Recommendations::default(),
    }
}

/// Create a retrieval-memory report with the given average accuracy
pub fn retrieval_report(accuracy: f64) -> RetrievalReport {
    RetrievalReport {
        records: vec![MeasurementRecord::new("Memory Retrieval", true, 1.2)
            .with_metric("retrieval_accuracy", accuracy)],
        summary: RetrievalSummary {
            total_tests: 1,
            passed_tests: 1,
            success_rate: Some(1.0),
            total_memory_operations: 12,
            avg_retrieval_accuracy: Some(accuracy),
        },
        recommendations: Recommendations::default(),
    }
}

/// Create a user-experience report, optionally with an error-handling probe
pub fn ux_report(avg_usability: f64, error_handling: Option<f64>) -> UxReport {
    let mut records = vec![MeasurementRecord::new("New User Onboarding", true, 4.0)
        .with_metric(USABILITY_SCORE_METRIC, avg_usability)];
    if let Some(score) = error_handling {
        records.push(
            MeasurementRecord::new("Error Handling UX", score >= 0.5, 1.0)
                .with_metric(USABILITY_SCORE_METRIC, score)
                .with_friction_points(vec!["Unclear error for missing project".to_string()]),
        );
    }
    UxReport {
        summary: UxSummary {
            total_tests: records.len(),
            passed_tests: records.len(),
            success_rate: Some(1.0),
            avg_usability_score: Some(avg_usability),
            total_friction_points: records.iter().map(|r| r.friction_points.len()).sum(),
        },
        records,
        recommendations: Recommendations::default(),
    }
}

/// Metrics that clear every threshold
pub fn healthy_metrics() -> MetricSet {
    MetricSet::default()
        .with(Metric::SystemReliability, 0.96)
        .with(Metric::PerformanceScore, 0.8)
        .with(Metric::UsabilityScore, 0.85)
        .with(Metric::RagEffectiveness, 0.9)
        .with(Metric::WorkflowEfficiency, 0.9)
        .with(Metric::ErrorResilience, 0.8)
}

/// A session started at 2024-01-02 03:04:05 local time
pub fn session() -> Session {
    Session::started_at(Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
}

/// Healthy results from all three suites, each with recommendations
pub fn full_results() -> SuiteResults {
    let mut core = core_report(1.0, 0.3, 0.95);
    core.recommendations = Recommendations::Flat(vec![
        "Add shell completion for common commands".to_string(),
        "Critical: fix intermittent failure in task creation".to_string(),
    ]);

    let mut rag = retrieval_report(0.9);
    rag.recommendations =
        Recommendations::Flat(vec!["Cache embeddings between sessions".to_string()]);

    let mut ux = ux_report(0.88, Some(0.8));
    ux.recommendations = Recommendations::Grouped(vec![RecommendationGroup {
        category: "onboarding".to_string(),
        items: vec![
            "Improve the first-run help text".to_string(),
            "Add shell completion for common commands".to_string(),
        ],
    }]);

    SuiteResults::new()
        .with_core(SuiteOutcome::Completed { report: core })
        .with_retrieval_memory(SuiteOutcome::Completed { report: rag })
        .with_user_experience(SuiteOutcome::Completed { report: ux })
}
