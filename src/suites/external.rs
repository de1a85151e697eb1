//! Suites backed by an external collector command.
//!
//! A collector is any shell command that runs its probes inside the workspace
//! and prints one [`SuiteOutcome`] as JSON on stdout. Banner text before the
//! JSON is ignored.

use std::marker::PhantomData;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::models::{SuiteId, SuiteOutcome};
use crate::suites::command::{CommandOutput, CommandRunner, COMMAND_NOT_FOUND};
use crate::suites::{Suite, SuiteError};
use crate::utils::extract_json_object;
use crate::workspace::Workspace;

const STDERR_EXCERPT_LEN: usize = 400;

/// A suite whose report of type `T` is produced by a collector command.
pub struct ExternalSuite<T, R> {
    id: SuiteId,
    command: String,
    runner: R,
    _report: PhantomData<fn() -> T>,
}

impl<T, R: CommandRunner> ExternalSuite<T, R> {
    pub fn new(id: SuiteId, command: impl Into<String>, runner: R) -> Self {
        Self {
            id,
            command: command.into(),
            runner,
            _report: PhantomData,
        }
    }
}

impl<T: DeserializeOwned, R: CommandRunner> Suite for ExternalSuite<T, R> {
    type Report = T;

    fn id(&self) -> SuiteId {
        self.id
    }

    fn run(&self, workspace: &Workspace) -> Result<SuiteOutcome<T>, SuiteError> {
        let output = self.runner.run(&self.command, workspace.path())?;
        if output.timed_out {
            return Err(SuiteError::TimedOut(output.duration.as_secs()));
        }
        debug!(
            "{} collector exited with {:?} after {:.2}s",
            self.id,
            output.exit_code,
            output.duration.as_secs_f64()
        );

        // A collector may report its own crash and still exit non-zero.
        match parse_outcome(&output.stdout) {
            Ok(outcome) => Ok(outcome),
            Err(_) if output.exit_code == Some(COMMAND_NOT_FOUND) => Ok(SuiteOutcome::Unavailable {
                reason: format!("collector command not found: {}", self.command),
            }),
            Err(_) if !output.success() => Err(SuiteError::Failed {
                code: output.exit_code,
                stderr: stderr_excerpt(&output),
            }),
            Err(e) => {
                warn!("{} collector printed unparseable output", self.id);
                Err(SuiteError::InvalidOutput(e))
            }
        }
    }
}

fn parse_outcome<T: DeserializeOwned>(stdout: &str) -> Result<SuiteOutcome<T>, String> {
    let json = extract_json_object(stdout).ok_or_else(|| "no JSON object in output".to_string())?;
    serde_json::from_str(json).map_err(|e| e.to_string())
}

fn stderr_excerpt(output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.chars().count() <= STDERR_EXCERPT_LEN {
        return stderr.to_string();
    }
    let tail: String = stderr
        .chars()
        .rev()
        .take(STDERR_EXCERPT_LEN)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("...{}", tail)
}
