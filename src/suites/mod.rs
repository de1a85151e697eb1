//! Suite collection.
//!
//! The probing suites themselves live outside this crate. A [`Suite`] produces a
//! [`SuiteOutcome`] for one suite kind; [`SuiteRunner`] runs the configured
//! suites in order, each in a fresh [`Workspace`], and gathers their outcomes
//! into [`SuiteResults`].

pub mod command;
pub mod external;

use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};

use crate::cancel;
use crate::config::EvalConfig;
use crate::models::{CoreReport, RetrievalReport, SuiteId, SuiteOutcome, SuiteResults, UxReport};
use crate::workspace::{Workspace, WorkspaceError};

pub use command::{CommandError, CommandOutput, CommandRunner, ShellRunner};
pub use external::ExternalSuite;

/// Errors from running a suite
#[derive(Debug, thiserror::Error)]
pub enum SuiteError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("Collector timed out after {0}s")]
    TimedOut(u64),
    #[error("Collector exited with {}: {stderr}", display_code(.code))]
    Failed { code: Option<i32>, stderr: String },
    #[error("Collector output is not a suite outcome: {0}")]
    InvalidOutput(String),
    #[error("Suite run interrupted")]
    Cancelled,
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl SuiteError {
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            SuiteError::Cancelled | SuiteError::Command(CommandError::Cancelled)
        )
    }
}

/// One probing suite.
pub trait Suite {
    type Report;

    fn id(&self) -> SuiteId;

    /// Run the suite inside `workspace`.
    fn run(&self, workspace: &Workspace) -> Result<SuiteOutcome<Self::Report>, SuiteError>;
}

/// How a requested suite will be obtained.
pub enum SuiteSlot<T> {
    Run(Box<dyn Suite<Report = T>>),
    /// The suite cannot run in this environment.
    Unavailable(String),
}

impl<T> SuiteSlot<T> {
    pub fn run(suite: impl Suite<Report = T> + 'static) -> Self {
        SuiteSlot::Run(Box::new(suite))
    }
}

const NO_COMMAND: &str = "no collector command configured";

/// The suites requested for one run. `None` means the suite is skipped.
pub struct SuiteSet {
    pub core: SuiteSlot<CoreReport>,
    pub retrieval_memory: Option<SuiteSlot<RetrievalReport>>,
    pub user_experience: Option<SuiteSlot<UxReport>>,
}

impl SuiteSet {
    /// Build collector-backed suites from configuration.
    pub fn from_config(config: &EvalConfig) -> Self {
        let runner = ShellRunner::new(Duration::from_secs(config.timeout_secs));
        Self {
            core: external_slot(SuiteId::Core, config.core_command.as_deref(), &runner),
            retrieval_memory: config.run_rag.then(|| {
                external_slot(SuiteId::RetrievalMemory, config.rag_command.as_deref(), &runner)
            }),
            user_experience: config.run_ux.then(|| {
                external_slot(SuiteId::UserExperience, config.ux_command.as_deref(), &runner)
            }),
        }
    }
}

fn external_slot<T>(id: SuiteId, command: Option<&str>, runner: &ShellRunner) -> SuiteSlot<T>
where
    T: serde::de::DeserializeOwned + 'static,
{
    match command {
        Some(command) => SuiteSlot::run(ExternalSuite::<T, _>::new(id, command, runner.clone())),
        None => SuiteSlot::Unavailable(NO_COMMAND.to_string()),
    }
}

/// Runs suites in isolated workspaces.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    source_root: PathBuf,
    fixtures: Vec<PathBuf>,
}

impl SuiteRunner {
    /// `fixtures` are copied from `source_root` into every workspace.
    pub fn new(source_root: impl Into<PathBuf>, fixtures: Vec<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            fixtures,
        }
    }

    /// Run core, retrieval-memory and user-experience suites in that order.
    ///
    /// Returns [`SuiteError::Cancelled`] if interrupted.
    pub fn run_all(&self, suites: &SuiteSet) -> Result<SuiteResults, SuiteError> {
        let mut results = SuiteResults::new();

        results.core = Some(self.run_slot(SuiteId::Core, &suites.core)?);

        if let Some(slot) = &suites.retrieval_memory {
            results.retrieval_memory = Some(self.run_slot(SuiteId::RetrievalMemory, slot)?);
        }

        if let Some(slot) = &suites.user_experience {
            results.user_experience = Some(self.run_slot(SuiteId::UserExperience, slot)?);
        }

        Ok(results)
    }

    fn run_slot<T>(&self, id: SuiteId, slot: &SuiteSlot<T>) -> Result<SuiteOutcome<T>, SuiteError> {
        if cancel::is_cancelled() {
            return Err(SuiteError::Cancelled);
        }
        match slot {
            SuiteSlot::Run(suite) => self.run_suite(suite.as_ref()),
            SuiteSlot::Unavailable(reason) => {
                warn!("{} suite unavailable: {}", id.title(), reason);
                Ok(SuiteOutcome::Unavailable {
                    reason: reason.clone(),
                })
            }
        }
    }

    /// Run one suite in a fresh workspace.
    ///
    /// Failures become a crashed outcome; only cancellation is returned as an error.
    pub fn run_suite<T>(
        &self,
        suite: &dyn Suite<Report = T>,
    ) -> Result<SuiteOutcome<T>, SuiteError> {
        let id = suite.id();
        info!("Running {} tests...", id.title());

        let outcome = Workspace::with_fixtures(&self.source_root, &self.fixtures)
            .map_err(SuiteError::from)
            .and_then(|workspace| {
                let outcome = suite.run(&workspace);
                if let Err(e) = workspace.close() {
                    warn!("{}", e);
                }
                outcome
            });

        match outcome {
            Ok(outcome) => {
                match &outcome {
                    SuiteOutcome::Completed { .. } => info!("{} tests completed", id.title()),
                    SuiteOutcome::Unavailable { reason } => {
                        warn!("{} tests unavailable: {}", id.title(), reason)
                    }
                    SuiteOutcome::Crashed { error } => {
                        warn!("{} tests crashed: {}", id.title(), error)
                    }
                }
                Ok(outcome)
            }
            Err(e) if e.is_cancelled() => Err(SuiteError::Cancelled),
            Err(e) => {
                warn!("{} tests failed: {}", id.title(), e);
                Ok(SuiteOutcome::Crashed {
                    error: e.to_string(),
                })
            }
        }
    }
}
