use std::ops::ControlFlow;

use chrono::{Local, NaiveDate};
use headcount::config::AppConfig;
use headcount::error::AppError;
use headcount::job::RunOutcome;
use headcount::schedule::{run_daily, SystemClock};
use headcount::telemetry;
use tracing::{error, info};

use crate::cli::RunArgs;
use crate::infra;

/// No subcommand given: the environment decides between a single run and
/// the resident daily schedule, which is how the container deployment
/// drives the process.
pub(crate) fn run_default() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    announce(&config);

    if config.schedule.run_and_exit {
        run_once_with(&config, None)
    } else {
        daemon_loop(&config)
    }
}

pub(crate) fn run_once(args: RunArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    announce(&config);
    run_once_with(&config, args.date)
}

pub(crate) fn run_daemon() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    announce(&config);
    daemon_loop(&config)
}

fn announce(config: &AppConfig) {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        run_and_exit = config.schedule.run_and_exit,
        "headcount reporter starting"
    );
}

/// One report, then exit. The explicit date wins over REPORT_DATE, which
/// wins over today.
fn run_once_with(config: &AppConfig, date_override: Option<NaiveDate>) -> Result<(), AppError> {
    let job = infra::build_job(config)?;
    let report_date = date_override
        .or(config.report.report_date)
        .unwrap_or_else(|| Local::now().date_naive());

    let outcome = job.run(report_date)?;
    log_outcome(&outcome);
    Ok(())
}

/// Resident mode: one report at the configured hour, every day, reporting
/// on the date the run fires. A failed run is logged and the schedule
/// keeps going.
fn daemon_loop(config: &AppConfig) -> Result<(), AppError> {
    let job = infra::build_job(config)?;
    info!(run_at = %config.schedule.run_at, "daily schedule armed");

    run_daily(&SystemClock, config.schedule.run_at, |day| {
        match job.run(day) {
            Ok(outcome) => log_outcome(&outcome),
            Err(err) => error!(report_date = %day, error = %err, "report run failed"),
        }
        ControlFlow::Continue(())
    });

    Ok(())
}

fn log_outcome(outcome: &RunOutcome) {
    info!(
        baseline_date = %outcome.baseline_date,
        report_date = %outcome.report_date,
        baseline_records = outcome.baseline_size,
        current_records = outcome.current_size,
        added = outcome.totals.added,
        removed = outcome.totals.removed,
        modified = outcome.totals.modified,
        archived = outcome.archived_to.is_some(),
        "report delivered"
    );
}
