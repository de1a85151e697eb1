use clap::Parser;
use log::LevelFilter;

use efficiency_eval::app::{App, EXIT_ERROR};
use efficiency_eval::cancel;
use efficiency_eval::cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    cancel::register_handler();

    // Fixture paths resolve against the directory the tool was started in.
    let app = App::new(".");
    match app.run(cli.command) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(EXIT_ERROR);
        }
    }
}
