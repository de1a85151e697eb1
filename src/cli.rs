use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::evaluation::OutputFormat;

/// Command line interface definition for efficiency-eval.
#[derive(Parser, Debug)]
#[command(name = "efficiency-eval")]
#[command(about = "Aggregate workflow test suite results into an efficiency verdict")]
#[command(version)]
pub struct Cli {
    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the suites and produce an efficiency report
    Run(RunArgs),
    /// Regenerate a report from saved suite results
    Report(ReportArgs),
    /// Render a saved efficiency report
    Show(ShowArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory for report artifacts [env: EFFICIENCY_EVAL_OUTPUT_DIR] [default: test_results]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the retrieval-memory suite
    #[arg(long)]
    pub no_rag: bool,

    /// Skip the user-experience suite
    #[arg(long)]
    pub no_ux: bool,

    /// Collector command for the core workflow suite [env: EFFICIENCY_EVAL_CORE_CMD]
    #[arg(long, value_name = "CMD")]
    pub core_cmd: Option<String>,

    /// Collector command for the retrieval-memory suite [env: EFFICIENCY_EVAL_RAG_CMD]
    #[arg(long, value_name = "CMD")]
    pub rag_cmd: Option<String>,

    /// Collector command for the user-experience suite [env: EFFICIENCY_EVAL_UX_CMD]
    #[arg(long, value_name = "CMD")]
    pub ux_cmd: Option<String>,

    /// File or directory copied into every suite workspace (repeatable)
    #[arg(long = "fixture", value_name = "PATH")]
    pub fixtures: Vec<PathBuf>,

    /// Per-suite timeout in seconds [env: EFFICIENCY_EVAL_TIMEOUT_SECS] [default: 300]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Console output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            core_command: self.core_cmd.clone(),
            rag_command: self.rag_cmd.clone(),
            ux_command: self.ux_cmd.clone(),
            no_rag: self.no_rag,
            no_ux: self.no_ux,
            output_dir: self.output_dir.clone(),
            timeout_secs: self.timeout,
            fixtures: self.fixtures.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Directory holding saved <suite>_results_<session>.json files
    #[arg(value_name = "RESULTS_DIR")]
    pub results_dir: PathBuf,

    /// Directory for the regenerated artifacts (default: RESULTS_DIR)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Console output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Saved efficiency_report_<session>.json (default: newest report in the output directory)
    #[arg(value_name = "REPORT_JSON")]
    pub report: Option<PathBuf>,

    /// Directory searched when no report is given [env: EFFICIENCY_EVAL_OUTPUT_DIR] [default: test_results]
    #[arg(short, long, value_name = "DIR", conflicts_with = "report")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,
}
