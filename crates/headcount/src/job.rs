use std::path::PathBuf;
use std::time::Instant;

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::archive::{ArchiveError, ReportArchive};
use crate::directory::{RetrievalError, SnapshotSource};
use crate::mail::{Mailer, SendError};
use crate::report::{render_html, ChangeReport, ChangeTotals};

/// Error enumeration for a single report run.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Send(#[from] SendError),
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub baseline_date: NaiveDate,
    pub report_date: NaiveDate,
    pub baseline_size: usize,
    pub current_size: usize,
    pub totals: ChangeTotals,
    pub archived_to: Option<PathBuf>,
}

/// One report run: fetch two snapshots, diff, render, archive, send.
///
/// Runs share nothing; every invocation fetches fresh snapshots. A failure
/// at any stage aborts the run and nothing is mailed.
pub struct ChangeReportJob<S, M> {
    source: S,
    mailer: M,
    archive: Option<ReportArchive>,
}

impl<S, M> ChangeReportJob<S, M>
where
    S: SnapshotSource,
    M: Mailer,
{
    pub fn new(source: S, mailer: M) -> Self {
        Self {
            source,
            mailer,
            archive: None,
        }
    }

    pub fn with_archive(mut self, archive: ReportArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Report on `report_date`, comparing against the previous calendar
    /// day.
    pub fn run(&self, report_date: NaiveDate) -> Result<RunOutcome, JobError> {
        self.run_between(report_date - Duration::days(1), report_date)
    }

    /// Report on `report_date` against an explicit baseline date.
    pub fn run_between(
        &self,
        baseline_date: NaiveDate,
        report_date: NaiveDate,
    ) -> Result<RunOutcome, JobError> {
        let started = Instant::now();
        info!(%baseline_date, %report_date, "starting headcount change run");

        let baseline = self.source.snapshot(baseline_date)?;
        let current = self.source.snapshot(report_date)?;
        info!(
            baseline_records = baseline.len(),
            current_records = current.len(),
            "snapshots fetched"
        );

        let report = ChangeReport::new(&baseline, &current);
        let totals = report.totals();
        let html = render_html(&report);

        // The copy is written before the send so whatever lands in the
        // archive is exactly what was mailed.
        let archived_to = match &self.archive {
            Some(archive) => Some(archive.store(report.report_date, &html)?),
            None => None,
        };

        self.mailer.send(&report.subject(), &html)?;

        info!(
            added = totals.added,
            removed = totals.removed,
            modified = totals.modified,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "report sent"
        );

        Ok(RunOutcome {
            baseline_date,
            report_date,
            baseline_size: baseline.len(),
            current_size: current.len(),
            totals,
            archived_to,
        })
    }
}
