//! Report artifacts on disk.
//!
//! A run writes its report as JSON and Markdown plus one JSON file per suite
//! outcome, all named by the session id. Suite files can be loaded back to
//! regenerate a report without re-running the suites.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::evaluation::report::{format_report, OutputFormat};
use crate::evaluation::types::EfficiencyReport;
use crate::models::{SuiteId, SuiteOutcome, SuiteResults};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Results directory not found: {0}")]
    MissingDirectory(PathBuf),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Paths of the files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifacts {
    pub report_json: PathBuf,
    pub summary_markdown: PathBuf,
    pub suite_files: Vec<PathBuf>,
}

pub fn report_filename(session_id: &str) -> String {
    format!("efficiency_report_{}.json", session_id)
}

pub fn summary_filename(session_id: &str) -> String {
    format!("efficiency_summary_{}.md", session_id)
}

pub fn suite_filename(suite: SuiteId, session_id: &str) -> String {
    format!("{}_results_{}.json", suite.name(), session_id)
}

/// Save a report, its Markdown summary and the suite outcomes it was built from.
pub fn save_report(
    report: &EfficiencyReport,
    results: &SuiteResults,
    dir: &Path,
) -> Result<SavedArtifacts, StoreError> {
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
    let session_id = &report.meta.test_session_id;

    let report_json = dir.join(report_filename(session_id));
    write_json(&report_json, report)?;

    let summary_markdown = dir.join(summary_filename(session_id));
    write_text(
        &summary_markdown,
        &format_report(report, OutputFormat::Markdown),
    )?;

    let mut suite_files = Vec::new();
    if let Some(core) = &results.core {
        suite_files.push(save_outcome(dir, SuiteId::Core, session_id, core)?);
    }
    if let Some(rag) = &results.retrieval_memory {
        suite_files.push(save_outcome(dir, SuiteId::RetrievalMemory, session_id, rag)?);
    }
    if let Some(ux) = &results.user_experience {
        suite_files.push(save_outcome(dir, SuiteId::UserExperience, session_id, ux)?);
    }

    Ok(SavedArtifacts {
        report_json,
        summary_markdown,
        suite_files,
    })
}

fn save_outcome<T: Serialize>(
    dir: &Path,
    suite: SuiteId,
    session_id: &str,
    outcome: &SuiteOutcome<T>,
) -> Result<PathBuf, StoreError> {
    let path = dir.join(suite_filename(suite, session_id));
    write_json(&path, outcome)?;
    Ok(path)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_text(path, &json)
}

// The writer is flushed explicitly so a failed flush surfaces as an error
// instead of being swallowed on drop.
fn write_text(path: &Path, contents: &str) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| StoreError::io(path, e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Load a saved report.
pub fn load_report(path: &Path) -> Result<EfficiencyReport, StoreError> {
    let json = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the newest saved outcome of each suite from a results directory.
///
/// A suite file that cannot be parsed becomes a crashed outcome for that suite.
pub fn load_suite_results(dir: &Path) -> Result<SuiteResults, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::MissingDirectory(dir.to_path_buf()));
    }

    let files = list_json_files(dir)?;
    Ok(SuiteResults {
        core: load_latest_outcome(&files, SuiteId::Core),
        retrieval_memory: load_latest_outcome(&files, SuiteId::RetrievalMemory),
        user_experience: load_latest_outcome(&files, SuiteId::UserExperience),
    })
}

/// Saved report files in a directory, oldest first.
pub fn list_reports(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(list_json_files(dir)?
        .into_iter()
        .filter(|p| file_name_starts_with(p, "efficiency_report_"))
        .collect())
}

fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))? {
        let path = entry.map_err(|e| StoreError::io(dir, e))?.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
    // Session ids sort chronologically.
    files.sort();
    Ok(files)
}

fn file_name_starts_with(path: &Path, prefix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with(prefix))
        .unwrap_or(false)
}

fn load_latest_outcome<T: DeserializeOwned>(
    files: &[PathBuf],
    suite: SuiteId,
) -> Option<SuiteOutcome<T>> {
    let prefix = format!("{}_results_", suite.name());
    let path = files
        .iter()
        .rev()
        .find(|p| file_name_starts_with(p, &prefix))?;

    debug!("Loading {} results from {}", suite, path.display());
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()));

    Some(parsed.unwrap_or_else(|error| {
        warn!("Could not read {}: {}", path.display(), error);
        SuiteOutcome::Crashed {
            error: format!("unreadable results file {}: {}", path.display(), error),
        }
    }))
}
