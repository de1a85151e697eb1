use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::cli::{Command, ReportArgs, RunArgs, ShowArgs};
use crate::config::{validate_output_dir, ConfigError, EvalConfig};
use crate::evaluation::{
    format_report, list_reports, load_report, load_suite_results, save_report, EfficiencyReport,
    OutputFormat, ReportAssembler, SavedArtifacts, Session, StoreError,
};
use crate::models::SuiteResults;
use crate::suites::{SuiteError, SuiteRunner, SuiteSet};
use crate::workspace::WorkspaceError;

/// Exit code for a run interrupted with Ctrl+C.
pub const EXIT_INTERRUPTED: i32 = 130;
/// Exit code for configuration and I/O failures.
pub const EXIT_ERROR: i32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Suite(#[from] SuiteError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("{0}")]
    User(String),
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The report passes, or a saved report was only displayed.
    Passed,
    NeedsImprovement,
    Interrupted,
}

impl RunStatus {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunStatus::Passed => 0,
            RunStatus::NeedsImprovement => 1,
            RunStatus::Interrupted => EXIT_INTERRUPTED,
        }
    }

    fn from_report(report: &EfficiencyReport) -> Self {
        if report.passes() {
            RunStatus::Passed
        } else {
            RunStatus::NeedsImprovement
        }
    }
}

pub struct App {
    source_root: PathBuf,
}

impl App {
    /// `source_root` is where fixture paths are resolved.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }

    pub fn run(&self, command: Command) -> Result<RunStatus, AppError> {
        match command {
            Command::Run(args) => self.handle_run(args),
            Command::Report(args) => self.handle_report(args),
            Command::Show(args) => self.handle_show(args),
        }
    }

    fn handle_run(&self, args: RunArgs) -> Result<RunStatus, AppError> {
        let config = EvalConfig::from_env().with_overrides(args.overrides());
        config.validate()?;

        let session = Session::start();
        info!("Starting efficiency evaluation session {}", session.id());

        let suites = SuiteSet::from_config(&config);
        let runner = SuiteRunner::new(&self.source_root, config.fixtures.clone());
        let results = match runner.run_all(&suites) {
            Ok(results) => results,
            Err(e) if e.is_cancelled() => {
                warn!("Testing interrupted by user");
                return Ok(RunStatus::Interrupted);
            }
            Err(e) => return Err(e.into()),
        };

        self.finish(session, &results, &config.output_dir, args.format)
    }

    fn handle_report(&self, args: ReportArgs) -> Result<RunStatus, AppError> {
        let output_dir = args.output_dir.unwrap_or_else(|| args.results_dir.clone());
        validate_output_dir(&output_dir)?;

        let results = load_suite_results(&args.results_dir)?;
        if results.suites_run().is_empty() {
            return Err(AppError::User(format!(
                "No suite results found in {}",
                args.results_dir.display()
            )));
        }
        info!(
            "Regenerating report from {} suite result(s) in {}",
            results.suites_run().len(),
            args.results_dir.display()
        );

        self.finish(Session::start(), &results, &output_dir, args.format)
    }

    fn handle_show(&self, args: ShowArgs) -> Result<RunStatus, AppError> {
        let path = match args.report {
            Some(path) => path,
            None => {
                let dir = args
                    .output_dir
                    .unwrap_or_else(|| EvalConfig::from_env().output_dir);
                let path = list_reports(&dir)?.pop().ok_or_else(|| {
                    AppError::User(format!("No saved reports in {}", dir.display()))
                })?;
                info!("Showing latest report {}", path.display());
                path
            }
        };
        let report = load_report(&path)?;
        println!("{}", format_report(&report, args.format));
        Ok(RunStatus::Passed)
    }

    fn finish(
        &self,
        session: Session,
        results: &SuiteResults,
        output_dir: &Path,
        format: OutputFormat,
    ) -> Result<RunStatus, AppError> {
        let report = ReportAssembler::new(session).assemble(results);
        println!("{}", format_report(&report, format));

        let saved = save_report(&report, results, output_dir)?;
        log_artifacts(&saved);

        Ok(RunStatus::from_report(&report))
    }
}

fn log_artifacts(saved: &SavedArtifacts) {
    info!("Report saved to: {}", saved.report_json.display());
    info!("Summary saved to: {}", saved.summary_markdown.display());
    for path in &saved.suite_files {
        info!("Suite results saved to: {}", path.display());
    }
}
