use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Identity of an organizational record, as assigned by the warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One employee's record as observed on a single snapshot date.
///
/// Identity is `employee_id`; every other field can change between
/// snapshots. Absent values stay `None` so the diff can tell "cleared"
/// apart from "set".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgRecord {
    pub employee_id: EmployeeId,
    pub employee_name: Option<String>,
    pub worker_status: Option<String>,
    pub employee_type: Option<String>,
    pub job_code: Option<String>,
    pub job_title: Option<String>,
    pub job_family: Option<String>,
    pub business_title: Option<String>,
    pub cost_center: Option<String>,
    pub location: Option<String>,
    pub manager: Option<String>,
    pub management_level: Option<String>,
    pub email_primary_work: Option<String>,
    /// The snapshot date this record was observed on. Not a tracked field.
    pub effective_date: NaiveDate,
}

impl OrgRecord {
    /// The fields compared between snapshots, in report order
    /// (alphabetical by field name).
    pub fn tracked_fields(&self) -> [(&'static str, Option<&str>); 12] {
        [
            ("business_title", self.business_title.as_deref()),
            ("cost_center", self.cost_center.as_deref()),
            ("email_primary_work", self.email_primary_work.as_deref()),
            ("employee_name", self.employee_name.as_deref()),
            ("employee_type", self.employee_type.as_deref()),
            ("job_code", self.job_code.as_deref()),
            ("job_family", self.job_family.as_deref()),
            ("job_title", self.job_title.as_deref()),
            ("location", self.location.as_deref()),
            ("management_level", self.management_level.as_deref()),
            ("manager", self.manager.as_deref()),
            ("worker_status", self.worker_status.as_deref()),
        ]
    }
}

/// All organizational records as of one date.
///
/// Each identifier appears at most once; when built from a row stream the
/// last row for an identifier wins. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    date: NaiveDate,
    records: BTreeMap<EmployeeId, OrgRecord>,
}

impl Snapshot {
    pub fn from_records(date: NaiveDate, records: impl IntoIterator<Item = OrgRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.employee_id.clone(), record))
            .collect();
        Self { date, records }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &EmployeeId) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &EmployeeId) -> Option<&OrgRecord> {
        self.records.get(id)
    }

    /// Records in ascending `EmployeeId` order.
    pub fn iter(&self) -> btree_map::Iter<'_, EmployeeId, OrgRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: Option<&str>) -> OrgRecord {
        OrgRecord {
            employee_id: EmployeeId(id.to_string()),
            employee_name: Some(format!("Employee {id}")),
            worker_status: Some("Active".to_string()),
            employee_type: None,
            job_code: None,
            job_title: title.map(str::to_string),
            job_family: None,
            business_title: None,
            cost_center: None,
            location: None,
            manager: None,
            management_level: None,
            email_primary_work: None,
            effective_date: NaiveDate::from_ymd_opt(2026, 8, 24).expect("valid date"),
        }
    }

    #[test]
    fn snapshot_keeps_one_record_per_identifier() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).expect("valid date");
        let snapshot = Snapshot::from_records(
            date,
            vec![
                record("1001", Some("Engineer")),
                record("1002", Some("Analyst")),
                record("1001", Some("Senior Engineer")),
            ],
        );

        assert_eq!(snapshot.len(), 2);
        let kept = snapshot
            .get(&EmployeeId("1001".to_string()))
            .expect("identifier present");
        assert_eq!(kept.job_title.as_deref(), Some("Senior Engineer"));
    }

    #[test]
    fn snapshot_iterates_in_identifier_order() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).expect("valid date");
        let snapshot = Snapshot::from_records(
            date,
            vec![
                record("1003", None),
                record("1001", None),
                record("1002", None),
            ],
        );

        let ids: Vec<&str> = snapshot.iter().map(|(id, _)| id.0.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1002", "1003"]);
    }

    #[test]
    fn employee_id_displays_as_its_raw_value() {
        assert_eq!(EmployeeId("1001".to_string()).to_string(), "1001");
    }

    #[test]
    fn tracked_fields_are_sorted_by_name() {
        let entry = record("1001", Some("Engineer"));
        let names: Vec<&str> = entry.tracked_fields().iter().map(|(name, _)| *name).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 12);
    }
}
