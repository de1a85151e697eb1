use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Identifies one of the three measurement suites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteId {
    /// Core workflow commands.
    Core,
    /// Retrieval-augmented memory integration.
    RetrievalMemory,
    /// User-experience probes.
    UserExperience,
}

impl SuiteId {
    /// All suites in run order.
    pub fn all() -> &'static [SuiteId] {
        &[
            SuiteId::Core,
            SuiteId::RetrievalMemory,
            SuiteId::UserExperience,
        ]
    }

    /// Stable name used in artifact file names and report keys.
    pub fn name(&self) -> &'static str {
        match self {
            SuiteId::Core => "core",
            SuiteId::RetrievalMemory => "retrieval-memory",
            SuiteId::UserExperience => "user-experience",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            SuiteId::Core => "Core Workflow",
            SuiteId::RetrievalMemory => "Retrieval Memory",
            SuiteId::UserExperience => "User Experience",
        }
    }
}

impl Display for SuiteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SuiteId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "core" => Ok(SuiteId::Core),
            "retrieval-memory" | "rag" => Ok(SuiteId::RetrievalMemory),
            "user-experience" | "ux" => Ok(SuiteId::UserExperience),
            _ => Err(format!(
                "Unknown suite: '{}'. Valid options: core, retrieval-memory, user-experience",
                s
            )),
        }
    }
}

/// Outcome of one probe. Created once by a suite and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub name: String,
    pub passed: bool,
    /// Elapsed seconds.
    pub duration: f64,
    /// Probe-specific numeric metrics; keys vary per probe.
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
    #[serde(default)]
    pub errors: Vec<String>,
    /// Usability obstacles noted while running the probe.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub friction_points: Vec<String>,
}

impl MeasurementRecord {
    pub fn new(name: impl Into<String>, passed: bool, duration: f64) -> Self {
        Self {
            name: name.into(),
            passed,
            duration: duration.max(0.0),
            metrics: BTreeMap::new(),
            errors: Vec::new(),
            friction_points: Vec::new(),
        }
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    pub fn with_friction_points(mut self, points: Vec<String>) -> Self {
        self.friction_points = points;
        self
    }

    /// Look up a metric that holds a finite value.
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied().filter(|v| v.is_finite())
    }
}

/// A named group of recommendations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationGroup {
    pub category: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Recommendations emitted by a suite, either flat or grouped by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendations {
    Flat(Vec<String>),
    Grouped(Vec<RecommendationGroup>),
}

impl Default for Recommendations {
    fn default() -> Self {
        Recommendations::Flat(Vec::new())
    }
}

impl Recommendations {
    /// Flatten category by category, preserving item order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Recommendations::Flat(items) => Box::new(items.iter().map(String::as_str)),
            Recommendations::Grouped(groups) => Box::new(
                groups
                    .iter()
                    .flat_map(|g| g.items.iter().map(String::as_str)),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Summary fields of the core workflow suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreSummary {
    #[serde(default)]
    pub total_tests: usize,
    #[serde(default)]
    pub passed_tests: usize,
    /// Fraction of probes that passed, in [0,1].
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub total_duration: f64,
    /// Average command response time in seconds.
    #[serde(default)]
    pub avg_command_response_time: Option<f64>,
    #[serde(default)]
    pub workflow_completion_rate: Option<f64>,
    #[serde(default)]
    pub error_rate: Option<f64>,
    #[serde(default)]
    pub user_satisfaction_score: Option<f64>,
}

/// Results of the core workflow suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreReport {
    #[serde(default)]
    pub records: Vec<MeasurementRecord>,
    #[serde(default)]
    pub summary: CoreSummary,
    #[serde(default)]
    pub recommendations: Recommendations,
}

/// Summary fields of the retrieval-memory suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSummary {
    #[serde(default)]
    pub total_tests: usize,
    #[serde(default)]
    pub passed_tests: usize,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub total_memory_operations: u64,
    #[serde(default)]
    pub avg_retrieval_accuracy: Option<f64>,
}

/// Results of the retrieval-memory suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalReport {
    #[serde(default)]
    pub records: Vec<MeasurementRecord>,
    #[serde(default)]
    pub summary: RetrievalSummary,
    #[serde(default)]
    pub recommendations: Recommendations,
}

/// Summary fields of the user-experience suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UxSummary {
    #[serde(default)]
    pub total_tests: usize,
    #[serde(default)]
    pub passed_tests: usize,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub avg_usability_score: Option<f64>,
    #[serde(default)]
    pub total_friction_points: usize,
}

/// Results of the user-experience suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UxReport {
    #[serde(default)]
    pub records: Vec<MeasurementRecord>,
    #[serde(default)]
    pub summary: UxSummary,
    #[serde(default)]
    pub recommendations: Recommendations,
}

/// What happened when a suite was asked to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SuiteOutcome<T> {
    /// The suite ran to completion.
    Completed { report: T },
    /// The suite could not run at all, e.g. its dependency is missing.
    Unavailable { reason: String },
    /// The suite failed while running.
    Crashed { error: String },
}

impl<T> SuiteOutcome<T> {
    pub fn completed(&self) -> Option<&T> {
        match self {
            SuiteOutcome::Completed { report } => Some(report),
            _ => None,
        }
    }

    pub fn status(&self) -> SuiteStatus {
        match self {
            SuiteOutcome::Completed { .. } => SuiteStatus::Completed,
            SuiteOutcome::Unavailable { .. } => SuiteStatus::Unavailable,
            SuiteOutcome::Crashed { .. } => SuiteStatus::Crashed,
        }
    }
}

/// Flattened status of a suite for reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteStatus {
    Completed,
    Unavailable,
    Crashed,
    /// The suite was not requested in this run.
    Skipped,
}

impl Display for SuiteStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuiteStatus::Completed => "completed",
            SuiteStatus::Unavailable => "unavailable",
            SuiteStatus::Crashed => "crashed",
            SuiteStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// The inputs of one report generation: at most one outcome per suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuiteResults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core: Option<SuiteOutcome<CoreReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval_memory: Option<SuiteOutcome<RetrievalReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_experience: Option<SuiteOutcome<UxReport>>,
}

impl SuiteResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_core(mut self, outcome: SuiteOutcome<CoreReport>) -> Self {
        self.core = Some(outcome);
        self
    }

    pub fn with_retrieval_memory(mut self, outcome: SuiteOutcome<RetrievalReport>) -> Self {
        self.retrieval_memory = Some(outcome);
        self
    }

    pub fn with_user_experience(mut self, outcome: SuiteOutcome<UxReport>) -> Self {
        self.user_experience = Some(outcome);
        self
    }

    pub fn core_report(&self) -> Option<&CoreReport> {
        self.core.as_ref().and_then(SuiteOutcome::completed)
    }

    pub fn retrieval_report(&self) -> Option<&RetrievalReport> {
        self.retrieval_memory
            .as_ref()
            .and_then(SuiteOutcome::completed)
    }

    pub fn ux_report(&self) -> Option<&UxReport> {
        self.user_experience
            .as_ref()
            .and_then(SuiteOutcome::completed)
    }

    /// Status of a suite, `Skipped` when it has no outcome.
    pub fn status(&self, suite: SuiteId) -> SuiteStatus {
        match suite {
            SuiteId::Core => self.core.as_ref().map(SuiteOutcome::status),
            SuiteId::RetrievalMemory => self.retrieval_memory.as_ref().map(SuiteOutcome::status),
            SuiteId::UserExperience => self.user_experience.as_ref().map(SuiteOutcome::status),
        }
        .unwrap_or(SuiteStatus::Skipped)
    }

    /// Suites that produced an outcome, in run order.
    pub fn suites_run(&self) -> Vec<SuiteId> {
        SuiteId::all()
            .iter()
            .copied()
            .filter(|id| self.status(*id) != SuiteStatus::Skipped)
            .collect()
    }

    /// Recommendations of every completed suite, in suite run order.
    pub fn recommendations(&self) -> Vec<&Recommendations> {
        let mut all = Vec::new();
        if let Some(core) = self.core_report() {
            all.push(&core.recommendations);
        }
        if let Some(rag) = self.retrieval_report() {
            all.push(&rag.recommendations);
        }
        if let Some(ux) = self.ux_report() {
            all.push(&ux.recommendations);
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suite_id_parse() {
        assert_eq!("core".parse::<SuiteId>().unwrap(), SuiteId::Core);
        assert_eq!("rag".parse::<SuiteId>().unwrap(), SuiteId::RetrievalMemory);
        assert_eq!(
            "user_experience".parse::<SuiteId>().unwrap(),
            SuiteId::UserExperience
        );
        assert!("bogus".parse::<SuiteId>().is_err());
    }

    #[test]
    fn grouped_recommendations_flatten_in_order() {
        let recs = Recommendations::Grouped(vec![
            RecommendationGroup {
                category: "speed".to_string(),
                items: vec!["a".to_string(), "b".to_string()],
            },
            RecommendationGroup {
                category: "docs".to_string(),
                items: vec!["c".to_string()],
            },
        ]);
        assert_eq!(recs.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn recommendations_deserialize_either_shape() {
        let flat: Recommendations = serde_json::from_str(r#"["x", "y"]"#).unwrap();
        assert_eq!(flat.iter().count(), 2);

        let grouped: Recommendations =
            serde_json::from_str(r#"[{"category": "perf", "items": ["z"]}]"#).unwrap();
        assert_eq!(grouped.iter().collect::<Vec<_>>(), vec!["z"]);
    }

    #[test]
    fn outcome_is_tagged_by_status() {
        let json = r#"{"status": "unavailable", "reason": "rag tools missing"}"#;
        let outcome: SuiteOutcome<RetrievalReport> = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.status(), SuiteStatus::Unavailable);
        assert!(outcome.completed().is_none());
    }

    #[test]
    fn missing_summary_keys_default_to_absent() {
        let json = r#"{"status": "completed", "report": {"summary": {}}}"#;
        let outcome: SuiteOutcome<CoreReport> = serde_json::from_str(json).unwrap();
        let report = outcome.completed().unwrap();
        assert_eq!(report.summary.success_rate, None);
        assert!(report.records.is_empty());
    }

    #[test]
    fn status_and_suites_run() {
        let results = SuiteResults::new()
            .with_core(SuiteOutcome::Crashed {
                error: "boom".to_string(),
            })
            .with_user_experience(SuiteOutcome::Completed {
                report: UxReport::default(),
            });
        assert_eq!(results.status(SuiteId::Core), SuiteStatus::Crashed);
        assert_eq!(
            results.status(SuiteId::RetrievalMemory),
            SuiteStatus::Skipped
        );
        assert_eq!(
            results.suites_run(),
            vec![SuiteId::Core, SuiteId::UserExperience]
        );
    }

    #[test]
    fn record_metric_ignores_non_finite() {
        let record = MeasurementRecord::new("probe", true, 0.5)
            .with_metric("ok", 0.25)
            .with_metric("bad", f64::NAN);
        assert_eq!(record.metric("ok"), Some(0.25));
        assert_eq!(record.metric("bad"), None);
        assert_eq!(record.metric("missing"), None);
    }
}
