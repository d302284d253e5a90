pub mod domain;
pub mod exports;
pub mod warehouse;

pub use domain::{EmployeeId, OrgRecord, Snapshot};

use chrono::NaiveDate;

/// Read-only access to dated views of the organizational directory.
///
/// Implementations return the complete record set for one day; the caller
/// decides which two days to compare. No caching, each call stands alone.
pub trait SnapshotSource {
    fn snapshot(&self, day: NaiveDate) -> Result<Snapshot, RetrievalError>;
}

/// Error enumeration for snapshot retrieval failures.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// The warehouse or export file could not be opened.
    #[error("snapshot source unreachable: {0}")]
    Unreachable(String),
    /// The snapshot query itself failed.
    #[error("snapshot query failed: {0}")]
    Query(String),
    /// Rows came back but could not be turned into records.
    #[error("snapshot data malformed: {0}")]
    Malformed(String),
    /// The source holds no rows for the requested date, usually because
    /// that day's warehouse load has not landed yet.
    #[error("no snapshot rows for {0}")]
    Empty(NaiveDate),
}
