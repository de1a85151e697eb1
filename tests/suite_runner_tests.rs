//! Integration tests for running collectors as real `sh` subprocesses

use std::fs;
use std::path::{Path, PathBuf};

use efficiency_eval::config::EvalConfig;
use efficiency_eval::models::{SuiteId, SuiteOutcome, SuiteStatus};
use efficiency_eval::suites::{SuiteRunner, SuiteSet};
use tempfile::TempDir;

/// A project directory holding collector scripts used as workspace fixtures
struct TestProject {
    dir: TempDir,
}

impl TestProject {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a collector script that prints `json` after some banner text
    fn collector(&self, name: &str, json: &str) -> PathBuf {
        let script = format!("echo 'Running {name}...'\ncat <<'JSON'\n{json}\nJSON\n");
        self.write_file(name, &script)
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        PathBuf::from(name)
    }

    fn runner(&self, fixtures: Vec<PathBuf>) -> SuiteRunner {
        SuiteRunner::new(self.path(), fixtures)
    }
}

const CORE_JSON: &str = r#"{"status": "completed", "report": {
  "records": [{"name": "Core Commands", "passed": true, "duration": 1.5,
               "metrics": {"avg_command_response_time": 0.4}}],
  "summary": {"success_rate": 0.95, "avg_command_response_time": 0.4,
              "workflow_completion_rate": 0.9},
  "recommendations": ["Add shell completion"]
}}"#;

const RAG_JSON: &str = r#"{"status": "unavailable", "reason": "memory server not installed"}"#;

fn config(core: &str, rag: Option<&str>, ux: Option<&str>) -> EvalConfig {
    EvalConfig {
        core_command: Some(core.to_string()),
        rag_command: rag.map(str::to_string),
        ux_command: ux.map(str::to_string),
        timeout_secs: 10,
        ..EvalConfig::default()
    }
}

#[test]
fn test_collectors_run_in_workspace_with_fixtures() {
    let project = TestProject::new();
    let core = project.collector("collect_core.sh", CORE_JSON);
    let rag = project.collector("collect_rag.sh", RAG_JSON);

    let suites = SuiteSet::from_config(&config(
        "sh collect_core.sh",
        Some("sh collect_rag.sh"),
        None,
    ));
    let results = project.runner(vec![core, rag]).run_all(&suites).unwrap();

    let core = results.core_report().expect("core suite should complete");
    assert_eq!(core.summary.success_rate, Some(0.95));
    assert_eq!(core.records[0].name, "Core Commands");
    assert_eq!(
        results.retrieval_memory,
        Some(SuiteOutcome::Unavailable {
            reason: "memory server not installed".to_string()
        })
    );
    assert_eq!(
        results.status(SuiteId::UserExperience),
        SuiteStatus::Unavailable
    );
}

#[test]
fn test_collector_does_not_touch_source_directory() {
    let project = TestProject::new();
    let script = project.write_file(
        "collect_core.sh",
        "touch created-by-collector\necho '{\"status\": \"crashed\", \"error\": \"nothing to do\"}'\n",
    );

    let mut config = config("sh collect_core.sh", None, None);
    config.run_rag = false;
    config.run_ux = false;
    let results = project
        .runner(vec![script])
        .run_all(&SuiteSet::from_config(&config))
        .unwrap();

    assert_eq!(results.status(SuiteId::Core), SuiteStatus::Crashed);
    assert!(!project.path().join("created-by-collector").exists());
    assert_eq!(results.suites_run(), vec![SuiteId::Core]);
}

#[test]
fn test_missing_collector_is_unavailable() {
    let project = TestProject::new();
    let suites = SuiteSet::from_config(&config("no-such-collector-binary-xyz", None, None));

    let results = project.runner(vec![]).run_all(&suites).unwrap();
    assert_eq!(results.status(SuiteId::Core), SuiteStatus::Unavailable);
}

#[test]
fn test_failing_collector_crashes_with_stderr() {
    let project = TestProject::new();
    let suites = SuiteSet::from_config(&config("echo 'boom' >&2; exit 3", None, None));

    let results = project.runner(vec![]).run_all(&suites).unwrap();
    match results.core {
        Some(SuiteOutcome::Crashed { error }) => {
            assert!(error.contains("status 3"), "error was: {error}");
            assert!(error.contains("boom"), "error was: {error}");
        }
        other => panic!("expected crashed core suite, got {other:?}"),
    }
}

#[test]
fn test_slow_collector_times_out() {
    let project = TestProject::new();
    let mut config = config("exec sleep 5", None, None);
    config.timeout_secs = 1;

    let results = project
        .runner(vec![])
        .run_all(&SuiteSet::from_config(&config))
        .unwrap();
    match results.core {
        Some(SuiteOutcome::Crashed { error }) => {
            assert!(error.contains("timed out"), "error was: {error}");
        }
        other => panic!("expected crashed core suite, got {other:?}"),
    }
}

#[test]
fn test_garbage_output_crashes() {
    let project = TestProject::new();
    let suites = SuiteSet::from_config(&config("echo 'all tests passed'", None, None));

    let results = project.runner(vec![]).run_all(&suites).unwrap();
    assert_eq!(results.status(SuiteId::Core), SuiteStatus::Crashed);
}
