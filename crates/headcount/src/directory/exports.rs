use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{EmployeeId, OrgRecord, Snapshot};
use super::RetrievalError;

/// Read a warehouse CSV export from `path` as the snapshot for `day`.
pub fn load_snapshot(path: &Path, day: NaiveDate) -> Result<Snapshot, RetrievalError> {
    let file = File::open(path)
        .map_err(|err| RetrievalError::Unreachable(format!("{}: {err}", path.display())))?;
    read_snapshot(file, day)
}

/// Parse a CSV export into a snapshot.
///
/// Headers are matched case-insensitively and values are trimmed; blank
/// cells become `None`. A row without an employee id is malformed. Rows
/// repeating an id keep the last occurrence.
pub fn read_snapshot<R: Read>(reader: R, day: NaiveDate) -> Result<Snapshot, RetrievalError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|err| RetrievalError::Malformed(err.to_string()))?
        .iter()
        .map(|header| header.to_ascii_lowercase())
        .collect::<csv::StringRecord>();
    csv_reader.set_headers(headers);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<ExportRow>().enumerate() {
        let row = row.map_err(|err| RetrievalError::Malformed(err.to_string()))?;
        match row.into_record(day) {
            Some(record) => records.push(record),
            None => {
                return Err(RetrievalError::Malformed(format!(
                    "line {}: missing employee_id",
                    index + 2
                )));
            }
        }
    }

    if records.is_empty() {
        return Err(RetrievalError::Empty(day));
    }

    Ok(Snapshot::from_records(day, records))
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employee_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employee_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    worker_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employee_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    job_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    job_title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    job_family: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    business_title: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cost_center: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    manager: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    management_level: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    email_primary_work: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    effective_date: Option<String>,
}

impl ExportRow {
    fn into_record(self, fallback_date: NaiveDate) -> Option<OrgRecord> {
        let employee_id = self.employee_id?;
        let effective_date = self
            .effective_date
            .as_deref()
            .and_then(|value| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
            .unwrap_or(fallback_date);

        Some(OrgRecord {
            employee_id: EmployeeId(employee_id),
            employee_name: self.employee_name,
            worker_status: self.worker_status,
            employee_type: self.employee_type,
            job_code: self.job_code,
            job_title: self.job_title,
            job_family: self.job_family,
            business_title: self.business_title,
            cost_center: self.cost_center,
            location: self.location,
            manager: self.manager,
            management_level: self.management_level,
            email_primary_work: self.email_primary_work,
            effective_date,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
