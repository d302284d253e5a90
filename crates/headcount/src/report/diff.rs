use crate::directory::Snapshot;

use super::ChangeEvent;

/// Compare two snapshots and produce the ordered change sequence.
///
/// Events come out grouped by kind (added, then removed, then modified);
/// each group is sorted by employee id, and modified events additionally
/// by field name. Pure function of its inputs: the same pair of snapshots
/// always yields the same sequence.
pub fn diff_snapshots(baseline: &Snapshot, current: &Snapshot) -> Vec<ChangeEvent> {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut modified = Vec::new();

    for (id, record) in current.iter() {
        if !baseline.contains(id) {
            added.push(ChangeEvent::added(record));
        }
    }

    for (id, before) in baseline.iter() {
        match current.get(id) {
            None => removed.push(ChangeEvent::removed(before)),
            Some(after) => {
                for ((field, old), (_, new)) in
                    before.tracked_fields().into_iter().zip(after.tracked_fields())
                {
                    if old != new {
                        modified.push(ChangeEvent::modified(after, field, old, new));
                    }
                }
            }
        }
    }

    // Snapshot iteration is id-ordered and tracked_fields() is
    // field-ordered, so concatenating the groups needs no sort.
    let mut events = added;
    events.extend(removed);
    events.extend(modified);
    events
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::directory::{EmployeeId, OrgRecord, Snapshot};
    use crate::report::ChangeKind;

    use super::*;

    fn record(id: &str) -> OrgRecord {
        OrgRecord {
            employee_id: EmployeeId(id.to_string()),
            employee_name: Some(format!("Employee {id}")),
            worker_status: Some("Active".to_string()),
            employee_type: Some("Regular".to_string()),
            job_code: Some("ENG2".to_string()),
            job_title: Some("Engineer".to_string()),
            job_family: Some("Engineering".to_string()),
            business_title: None,
            cost_center: Some("CC-140".to_string()),
            location: Some("Austin".to_string()),
            manager: Some("1000".to_string()),
            management_level: Some("IC".to_string()),
            email_primary_work: None,
            effective_date: NaiveDate::from_ymd_opt(2026, 8, 24).expect("valid date"),
        }
    }

    fn snapshot(day: (i32, u32, u32), records: Vec<OrgRecord>) -> Snapshot {
        let date = NaiveDate::from_ymd_opt(day.0, day.1, day.2).expect("valid date");
        Snapshot::from_records(date, records)
    }

    #[test]
    fn identical_snapshots_produce_no_events() {
        let baseline = snapshot((2026, 8, 23), vec![record("1001"), record("1002")]);
        let current = snapshot((2026, 8, 24), vec![record("1001"), record("1002")]);

        assert!(diff_snapshots(&baseline, &current).is_empty());
    }

    #[test]
    fn empty_baseline_marks_every_identifier_added() {
        let baseline = snapshot((2026, 8, 23), vec![]);
        let current = snapshot((2026, 8, 24), vec![record("1002"), record("1001")]);

        let events = diff_snapshots(&baseline, &current);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.kind == ChangeKind::Added));
        let ids: Vec<&str> = events.iter().map(|event| event.employee_id.0.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1002"]);
    }

    #[test]
    fn empty_current_marks_every_identifier_removed() {
        let baseline = snapshot((2026, 8, 23), vec![record("1001"), record("1002")]);
        let current = snapshot((2026, 8, 24), vec![]);

        let events = diff_snapshots(&baseline, &current);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event.kind == ChangeKind::Removed));
    }

    #[test]
    fn single_field_change_yields_exactly_one_event() {
        let baseline = snapshot((2026, 8, 23), vec![record("1001")]);
        let mut changed = record("1001");
        changed.job_title = Some("Senior Engineer".to_string());
        let current = snapshot((2026, 8, 24), vec![changed]);

        let events = diff_snapshots(&baseline, &current);
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.kind, ChangeKind::Modified);
        assert_eq!(event.field, Some("job_title"));
        assert_eq!(event.old_value.as_deref(), Some("Engineer"));
        assert_eq!(event.new_value.as_deref(), Some("Senior Engineer"));
    }

    #[test]
    fn title_change_plus_new_hire_matches_expected_events() {
        let baseline = snapshot((2026, 8, 23), vec![record("1")]);
        let mut promoted = record("1");
        promoted.job_title = Some("Senior Engineer".to_string());
        let mut analyst = record("2");
        analyst.job_title = Some("Analyst".to_string());
        let current = snapshot((2026, 8, 24), vec![promoted, analyst]);

        let events = diff_snapshots(&baseline, &current);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].kind, ChangeKind::Added);
        assert_eq!(events[0].employee_id, EmployeeId("2".to_string()));

        assert_eq!(events[1].kind, ChangeKind::Modified);
        assert_eq!(events[1].employee_id, EmployeeId("1".to_string()));
        assert_eq!(events[1].field, Some("job_title"));
        assert_eq!(events[1].old_value.as_deref(), Some("Engineer"));
        assert_eq!(events[1].new_value.as_deref(), Some("Senior Engineer"));
    }

    #[test]
    fn added_and_removed_sets_are_symmetric() {
        let baseline = snapshot((2026, 8, 23), vec![record("1001"), record("1002")]);
        let current = snapshot((2026, 8, 24), vec![record("1002"), record("1003")]);

        let forward = diff_snapshots(&baseline, &current);
        let backward = diff_snapshots(&current, &baseline);

        let forward_added: Vec<_> = forward
            .iter()
            .filter(|event| event.kind == ChangeKind::Added)
            .map(|event| event.employee_id.clone())
            .collect();
        let backward_removed: Vec<_> = backward
            .iter()
            .filter(|event| event.kind == ChangeKind::Removed)
            .map(|event| event.employee_id.clone())
            .collect();
        assert_eq!(forward_added, backward_removed);

        let forward_removed: Vec<_> = forward
            .iter()
            .filter(|event| event.kind == ChangeKind::Removed)
            .map(|event| event.employee_id.clone())
            .collect();
        let backward_added: Vec<_> = backward
            .iter()
            .filter(|event| event.kind == ChangeKind::Added)
            .map(|event| event.employee_id.clone())
            .collect();
        assert_eq!(forward_removed, backward_added);
    }

    #[test]
    fn events_come_grouped_by_kind_then_id_then_field() {
        let baseline = snapshot(
            (2026, 8, 23),
            vec![record("1001"), record("1005"), record("1009")],
        );

        let mut reorged = record("1005");
        reorged.cost_center = Some("CC-310".to_string());
        reorged.manager = Some("1002".to_string());
        let mut renamed = record("1001");
        renamed.employee_name = Some("Dana Flores-Reyes".to_string());
        let current = snapshot(
            (2026, 8, 24),
            vec![renamed, reorged, record("1012"), record("1002")],
        );

        let events = diff_snapshots(&baseline, &current);
        let observed: Vec<(ChangeKind, &str, Option<&str>)> = events
            .iter()
            .map(|event| (event.kind, event.employee_id.0.as_str(), event.field))
            .collect();

        assert_eq!(
            observed,
            vec![
                (ChangeKind::Added, "1002", None),
                (ChangeKind::Added, "1012", None),
                (ChangeKind::Removed, "1009", None),
                (ChangeKind::Modified, "1001", Some("employee_name")),
                (ChangeKind::Modified, "1005", Some("cost_center")),
                (ChangeKind::Modified, "1005", Some("manager")),
            ]
        );
    }

    #[test]
    fn clearing_and_setting_values_keep_the_none_side() {
        let mut before = record("1001");
        before.email_primary_work = Some("dana@example.com".to_string());
        before.business_title = None;
        let baseline = snapshot((2026, 8, 23), vec![before]);

        let mut after = record("1001");
        after.email_primary_work = None;
        after.business_title = Some("Staff Engineer".to_string());
        let current = snapshot((2026, 8, 24), vec![after]);

        let events = diff_snapshots(&baseline, &current);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].field, Some("business_title"));
        assert_eq!(events[0].old_value, None);
        assert_eq!(events[0].new_value.as_deref(), Some("Staff Engineer"));

        assert_eq!(events[1].field, Some("email_primary_work"));
        assert_eq!(events[1].old_value.as_deref(), Some("dana@example.com"));
        assert_eq!(events[1].new_value, None);
    }

    #[test]
    fn removed_events_carry_the_baseline_name() {
        let mut leaving = record("1001");
        leaving.employee_name = Some("Dana Flores".to_string());
        let baseline = snapshot((2026, 8, 23), vec![leaving]);
        let current = snapshot((2026, 8, 24), vec![]);

        let events = diff_snapshots(&baseline, &current);
        assert_eq!(events[0].employee_name.as_deref(), Some("Dana Flores"));
    }
}
