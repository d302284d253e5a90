mod diff;
mod render;

pub use diff::diff_snapshots;
pub use render::{render_html, render_text};

use chrono::NaiveDate;
use serde::Serialize;

use crate::directory::{EmployeeId, OrgRecord, Snapshot};

/// Classification of one detected difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// One detected difference between two snapshots.
///
/// `field`, `old_value`, and `new_value` are populated for `Modified`
/// events only, and old and new never hold the same value. A `None` value
/// on either side means the field was unset on that day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub employee_id: EmployeeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub kind: ChangeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl ChangeEvent {
    pub(crate) fn added(record: &OrgRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            kind: ChangeKind::Added,
            field: None,
            old_value: None,
            new_value: None,
        }
    }

    pub(crate) fn removed(record: &OrgRecord) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            kind: ChangeKind::Removed,
            field: None,
            old_value: None,
            new_value: None,
        }
    }

    pub(crate) fn modified(
        record: &OrgRecord,
        field: &'static str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> Self {
        Self {
            employee_id: record.employee_id.clone(),
            employee_name: record.employee_name.clone(),
            kind: ChangeKind::Modified,
            field: Some(field),
            old_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
        }
    }
}

/// Event counts by kind. `modified` counts field-level events, not
/// employees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeTotals {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl ChangeTotals {
    pub fn tally(events: &[ChangeEvent]) -> Self {
        let mut totals = Self::default();
        for event in events {
            match event.kind {
                ChangeKind::Added => totals.added += 1,
                ChangeKind::Removed => totals.removed += 1,
                ChangeKind::Modified => totals.modified += 1,
            }
        }
        totals
    }

    pub fn grand_total(&self) -> usize {
        self.added + self.removed + self.modified
    }
}

/// The diff between two snapshots, ready to render and send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeReport {
    pub baseline_date: NaiveDate,
    pub report_date: NaiveDate,
    pub events: Vec<ChangeEvent>,
}

impl ChangeReport {
    pub fn new(baseline: &Snapshot, current: &Snapshot) -> Self {
        Self {
            baseline_date: baseline.date(),
            report_date: current.date(),
            events: diff_snapshots(baseline, current),
        }
    }

    /// Email subject line for this report.
    pub fn subject(&self) -> String {
        format!("Organizational changes for {}", self.report_date)
    }

    pub fn totals(&self) -> ChangeTotals {
        ChangeTotals::tally(&self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_of(&self, kind: ChangeKind) -> impl Iterator<Item = &ChangeEvent> {
        self.events.iter().filter(move |event| event.kind == kind)
    }
}
