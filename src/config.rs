//! Run configuration.
//!
//! Values come from the environment first and are then overridden by CLI flags.

use std::env;
use std::path::{Path, PathBuf};

use log::warn;

pub const CORE_CMD_VAR: &str = "EFFICIENCY_EVAL_CORE_CMD";
pub const RAG_CMD_VAR: &str = "EFFICIENCY_EVAL_RAG_CMD";
pub const UX_CMD_VAR: &str = "EFFICIENCY_EVAL_UX_CMD";
pub const OUTPUT_DIR_VAR: &str = "EFFICIENCY_EVAL_OUTPUT_DIR";
pub const TIMEOUT_VAR: &str = "EFFICIENCY_EVAL_TIMEOUT_SECS";
pub const FIXTURES_VAR: &str = "EFFICIENCY_EVAL_FIXTURES";

pub const DEFAULT_OUTPUT_DIR: &str = "test_results";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Timeout must be at least one second")]
    ZeroTimeout,
    #[error("Output path {0} exists and is not a directory")]
    OutputDirIsFile(PathBuf),
}

/// Configuration for an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalConfig {
    /// Collector command for the core workflow suite.
    pub core_command: Option<String>,
    pub rag_command: Option<String>,
    pub ux_command: Option<String>,
    pub run_rag: bool,
    pub run_ux: bool,
    /// Directory that receives report artifacts.
    pub output_dir: PathBuf,
    /// Per-suite collector timeout.
    pub timeout_secs: u64,
    /// Paths copied into each suite workspace.
    pub fixtures: Vec<PathBuf>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            core_command: None,
            rag_command: None,
            ux_command: None,
            run_rag: true,
            run_ux: true,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fixtures: Vec::new(),
        }
    }
}

/// CLI values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub core_command: Option<String>,
    pub rag_command: Option<String>,
    pub ux_command: Option<String>,
    pub no_rag: bool,
    pub no_ux: bool,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub fixtures: Vec<PathBuf>,
}

impl EvalConfig {
    /// Create config from environment variables.
    ///
    /// Reads:
    /// - `EFFICIENCY_EVAL_CORE_CMD`, `EFFICIENCY_EVAL_RAG_CMD`, `EFFICIENCY_EVAL_UX_CMD` - collector commands
    /// - `EFFICIENCY_EVAL_OUTPUT_DIR` - artifact directory
    /// - `EFFICIENCY_EVAL_TIMEOUT_SECS` - per-suite timeout in seconds
    /// - `EFFICIENCY_EVAL_FIXTURES` - comma-separated fixture paths
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self {
            core_command: non_empty(CORE_CMD_VAR),
            rag_command: non_empty(RAG_CMD_VAR),
            ux_command: non_empty(UX_CMD_VAR),
            ..Self::default()
        };

        if let Some(dir) = non_empty(OUTPUT_DIR_VAR) {
            config.output_dir = PathBuf::from(dir);
        }

        if let Some(value) = non_empty(TIMEOUT_VAR) {
            match value.trim().parse() {
                Ok(secs) => config.timeout_secs = secs,
                Err(_) => warn!(
                    "Invalid {} '{}', using {}s",
                    TIMEOUT_VAR, value, DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        if let Some(value) = non_empty(FIXTURES_VAR) {
            config.fixtures = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        config
    }

    /// Merge with CLI overrides. CLI values take precedence.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(cmd) = overrides.core_command {
            self.core_command = Some(cmd);
        }
        if let Some(cmd) = overrides.rag_command {
            self.rag_command = Some(cmd);
        }
        if let Some(cmd) = overrides.ux_command {
            self.ux_command = Some(cmd);
        }
        if overrides.no_rag {
            self.run_rag = false;
        }
        if overrides.no_ux {
            self.run_ux = false;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout_secs = secs;
        }
        if !overrides.fixtures.is_empty() {
            self.fixtures = overrides.fixtures;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        validate_output_dir(&self.output_dir)
    }
}

/// Check that `dir` is a directory or can be created as one.
pub fn validate_output_dir(dir: &Path) -> Result<(), ConfigError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ConfigError::OutputDirIsFile(dir.to_path_buf()));
    }
    Ok(())
}
