//! Risk assessment over the normalized metrics.

use serde::{Deserialize, Serialize};

use crate::evaluation::metrics::{Metric, MetricSet};

/// Upper bound of the risk score.
pub const MAX_RISK_SCORE: u32 = 10;

const HIGH_RISK_WEIGHT: u32 = 3;
const MEDIUM_RISK_WEIGHT: u32 = 2;
const LOW_RISK_WEIGHT: u32 = 1;

/// Risk findings bucketed by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub high_risk: Vec<String>,
    pub medium_risk: Vec<String>,
    pub low_risk: Vec<String>,
    /// Weighted count of findings, capped at [`MAX_RISK_SCORE`].
    pub risk_score: u32,
}

/// Evaluate the high, medium and low risk rules independently.
pub fn assess_risks(metrics: &MetricSet) -> RiskAssessment {
    let mut risks = RiskAssessment::default();

    if metrics.below(Metric::SystemReliability, 0.6) {
        risks
            .high_risk
            .push("System reliability below 60%".to_string());
    }
    if metrics.below(Metric::PerformanceScore, 0.4) {
        risks
            .high_risk
            .push("Performance significantly below acceptable levels".to_string());
    }

    if metrics.below(Metric::UsabilityScore, 0.7) {
        risks
            .medium_risk
            .push("Usability issues may impact adoption".to_string());
    }
    if metrics.below(Metric::WorkflowEfficiency, 0.8) {
        risks
            .medium_risk
            .push("Workflow inefficiencies detected".to_string());
    }

    // Missing RAG data is not a risk on its own, only a weak measurement is.
    if let Some(rag) = metrics.rag_effectiveness {
        if rag > 0.0 && rag < 0.8 {
            risks
                .low_risk
                .push("RAG system could be more effective".to_string());
        }
    }

    risks.risk_score = risk_score(
        risks.high_risk.len(),
        risks.medium_risk.len(),
        risks.low_risk.len(),
    );
    risks
}

/// Weighted risk score, capped so it stays within the display range.
pub fn risk_score(high: usize, medium: usize, low: usize) -> u32 {
    let weighted = |count: usize, weight: u32| (count as u64).saturating_mul(u64::from(weight));
    let raw = weighted(high, HIGH_RISK_WEIGHT)
        .saturating_add(weighted(medium, MEDIUM_RISK_WEIGHT))
        .saturating_add(weighted(low, LOW_RISK_WEIGHT));
    raw.min(u64::from(MAX_RISK_SCORE)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::healthy_metrics;

    #[test]
    fn healthy_metrics_carry_no_risk() {
        let risks = assess_risks(&healthy_metrics());
        assert_eq!(risks, RiskAssessment::default());
    }

    #[test]
    fn every_rule_fires_and_score_is_capped() {
        let metrics = MetricSet::default().with(Metric::RagEffectiveness, 0.5);
        let risks = assess_risks(&metrics);

        assert_eq!(risks.high_risk.len(), 2);
        assert_eq!(risks.medium_risk.len(), 2);
        assert_eq!(risks.low_risk.len(), 1);
        assert_eq!(risks.risk_score, MAX_RISK_SCORE);
    }

    #[test]
    fn score_never_exceeds_cap() {
        assert_eq!(risk_score(5, 4, 0), 10);
        assert_eq!(risk_score(usize::MAX, usize::MAX, usize::MAX), 10);
        assert_eq!(risk_score(0, 0, usize::MAX), 10);
        assert_eq!(risk_score(1, 1, 1), 6);
        assert_eq!(risk_score(0, 0, 0), 0);
    }

    #[test]
    fn absent_rag_is_not_a_risk() {
        let risks = assess_risks(&MetricSet {
            rag_effectiveness: None,
            ..healthy_metrics()
        });
        assert!(risks.low_risk.is_empty());
    }

    #[test]
    fn measured_zero_rag_is_not_a_low_risk() {
        let risks = assess_risks(&healthy_metrics().with(Metric::RagEffectiveness, 0.0));
        assert!(risks.low_risk.is_empty());
    }

    #[test]
    fn weak_rag_is_a_low_risk() {
        let risks = assess_risks(&healthy_metrics().with(Metric::RagEffectiveness, 0.79));
        assert_eq!(risks.low_risk, vec!["RAG system could be more effective"]);
        assert_eq!(risks.risk_score, 1);
    }

    #[test]
    fn medium_rules_use_their_own_thresholds() {
        let metrics = healthy_metrics()
            .with(Metric::UsabilityScore, 0.65)
            .with(Metric::WorkflowEfficiency, 0.85);
        let risks = assess_risks(&metrics);
        assert_eq!(risks.medium_risk, vec!["Usability issues may impact adoption"]);
        assert_eq!(risks.risk_score, 2);
    }
}
