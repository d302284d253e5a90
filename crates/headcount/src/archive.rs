use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

/// Keeps one on-disk copy of each mailed report body, named by report
/// date.
#[derive(Debug, Clone)]
pub struct ReportArchive {
    dir: PathBuf,
}

/// Error enumeration for archive write failures.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("could not create archive directory {path}: {reason}")]
    CreateDir { path: String, reason: String },
    #[error("could not write report copy {path}: {reason}")]
    Write { path: String, reason: String },
}

impl ReportArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the report body for `date`, creating the directory on first
    /// use. A rerun for the same date replaces the earlier copy. Returns
    /// the path written.
    pub fn store(&self, date: NaiveDate, html_body: &str) -> Result<PathBuf, ArchiveError> {
        fs::create_dir_all(&self.dir).map_err(|err| ArchiveError::CreateDir {
            path: self.dir.display().to_string(),
            reason: err.to_string(),
        })?;

        let path = self.dir.join(format!("headcount-changes-{date}.html"));
        fs::write(&path, html_body).map_err(|err| ArchiveError::Write {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

        Ok(path)
    }
}
