use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use headcount::directory::exports;
use headcount::error::AppError;
use headcount::report::{render_html, render_text, ChangeEvent, ChangeReport, ChangeTotals};
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Baseline snapshot export (CSV)
    #[arg(long)]
    pub(crate) baseline: PathBuf,
    /// Current snapshot export (CSV)
    #[arg(long)]
    pub(crate) current: PathBuf,
    /// Report date for the current export (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print the exact HTML email body instead of the text report
    #[arg(long, conflicts_with = "json")]
    pub(crate) html: bool,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// Machine-readable shape of a previewed report.
#[derive(Debug, Serialize)]
struct PreviewPayload {
    baseline_date: NaiveDate,
    report_date: NaiveDate,
    subject: String,
    totals: ChangeTotals,
    events: Vec<ChangeEvent>,
}

/// Diff two snapshot exports and print the report, exercising the same
/// pipeline as a real run minus the warehouse and the mail gateway.
pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    print!("{}", preview_output(&args)?);
    Ok(())
}

fn preview_output(args: &PreviewArgs) -> Result<String, AppError> {
    let report_date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let baseline_date = report_date - Duration::days(1);

    let baseline = exports::load_snapshot(&args.baseline, baseline_date)?;
    let current = exports::load_snapshot(&args.current, report_date)?;
    let report = ChangeReport::new(&baseline, &current);

    if args.json {
        let payload = PreviewPayload {
            baseline_date: report.baseline_date,
            report_date: report.report_date,
            subject: report.subject(),
            totals: report.totals(),
            events: report.events,
        };
        return Ok(match serde_json::to_string_pretty(&payload) {
            Ok(json) => format!("{json}\n"),
            Err(err) => format!("JSON payload unavailable: {err}\n"),
        });
    }

    if args.html {
        Ok(render_html(&report))
    } else {
        Ok(render_text(&report))
    }
}
