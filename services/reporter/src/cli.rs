use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use headcount::error::AppError;

use crate::preview::{run_preview, PreviewArgs};
use crate::runner;

#[derive(Parser, Debug)]
#[command(
    name = "Headcount Change Reporter",
    about = "Detect day-over-day changes in organizational headcount and mail a summary report",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Produce and send one report immediately, then exit
    Run(RunArgs),
    /// Stay resident and send a report at the configured hour every day
    Daemon,
    /// Render a report from two snapshot exports, no warehouse or SMTP needed
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Report date (YYYY-MM-DD). Defaults to REPORT_DATE, then today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

/// Without a subcommand the environment picks the mode: RUN_AND_EXIT=true
/// performs a single run, anything else stays resident on the daily
/// schedule.
pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        None => runner::run_default(),
        Some(Command::Run(args)) => runner::run_once(args),
        Some(Command::Daemon) => runner::run_daemon(),
        Some(Command::Preview(args)) => run_preview(args),
    }
}
