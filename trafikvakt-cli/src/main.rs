//! ## trafikvakt-cli
//! **Operational front end for the analytics engine**
//!
//! Three jobs: generate reproducible synthetic datasets, run every named
//! view over recorded data as a one-shot report, and run a single view
//! with explicit parameters.

use clap::Parser;
use trafikvakt_telemetry::logging::EventLogger;

mod commands;
mod data;
mod error;
mod generate;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), error::CliError> {
    EventLogger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => commands::run_generate(args),
        Commands::Report(args) => commands::run_report(args),
        Commands::View(args) => commands::run_view(args),
    }
}
