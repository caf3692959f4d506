//! Cross-group attendance aggregation.
//!
//! Every enrolled group's attendance history is fetched independently and
//! concurrently; a failing group contributes nothing and is reported as a
//! failed slice instead of aborting the others.

use futures::future::join_all;
use tracing::{info, warn};

use crate::api::SchoolApi;
use crate::domain::calendar::parse_calendar_date;
use crate::domain::identity::TargetIdentity;
use shared::{AttendanceEntry, FailedSlice, Group};

/// Merged attendance across enrolled groups, newest first, plus the slices
/// that could not be fetched.
#[derive(Debug, Clone, Default)]
pub struct AttendanceAggregate {
    pub records: Vec<AttendanceEntry>,
    pub failed: Vec<FailedSlice>,
}

/// Fetch, filter, and merge the target's attendance from every group.
pub async fn aggregate_attendance(
    api: &dyn SchoolApi,
    target: TargetIdentity,
    groups: &[Group],
) -> AttendanceAggregate {
    let fetches = groups.iter().map(|group| async move {
        match api.attendance_history(group.id).await {
            Ok(history) => Ok((group, history)),
            Err(err) => {
                warn!("attendance fetch failed for group {}: {}", group.id, err);
                Err(FailedSlice {
                    group_id: group.id,
                    year: None,
                    month: None,
                    message: err.to_string(),
                })
            }
        }
    });

    let mut aggregate = AttendanceAggregate::default();
    for outcome in join_all(fetches).await {
        match outcome {
            Ok((group, history)) => {
                for record in history {
                    if !target.matches(&record) {
                        continue;
                    }
                    let Some(date) = record.raw_date().and_then(parse_calendar_date) else {
                        warn!(
                            "skipping attendance record {} in group {}: unparsable date",
                            record.id, group.id
                        );
                        continue;
                    };
                    aggregate.records.push(AttendanceEntry {
                        id: record.id,
                        group_id: group.id,
                        group_name: group.display_name().to_string(),
                        date,
                        status: record.status,
                    });
                }
            }
            Err(slice) => aggregate.failed.push(slice),
        }
    }

    // Newest first for the record list.
    aggregate.records.sort_by(|a, b| b.date.cmp(&a.date));

    info!(
        "aggregated {} attendance records for target {} across {} groups ({} slices failed)",
        aggregate.records.len(),
        target.id,
        groups.len(),
        aggregate.failed.len()
    );
    aggregate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::{attendance_record, group_with_students, FakeSchoolApi};
    use shared::{AttendanceStatus, TargetKind};

    fn target() -> TargetIdentity {
        TargetIdentity {
            id: 7,
            kind: TargetKind::Student,
        }
    }

    #[tokio::test]
    async fn merges_and_sorts_across_groups_newest_first() {
        let mut api = FakeSchoolApi::new();
        let groups = vec![
            group_with_students(1, "Math", &["a@x.com"]),
            group_with_students(2, "Physics", &["a@x.com"]),
        ];
        api.attendance.insert(
            1,
            vec![
                attendance_record(10, Some(7), None, "2025-01-05", AttendanceStatus::Present),
                attendance_record(11, Some(99), None, "2025-01-05", AttendanceStatus::Absent),
            ],
        );
        api.attendance.insert(
            2,
            vec![attendance_record(
                20,
                Some(7),
                None,
                "2025-02-02",
                AttendanceStatus::Late,
            )],
        );

        let aggregate = aggregate_attendance(&api, target(), &groups).await;

        assert!(aggregate.failed.is_empty());
        let ids: Vec<i64> = aggregate.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![20, 10]);
        assert_eq!(aggregate.records[0].group_name, "Physics");
    }

    #[tokio::test]
    async fn a_failing_group_is_reported_without_aborting_the_rest() {
        let mut api = FakeSchoolApi::new();
        let groups = vec![
            group_with_students(1, "Math", &["a@x.com"]),
            group_with_students(2, "Physics", &["a@x.com"]),
        ];
        api.attendance.insert(
            1,
            vec![attendance_record(
                10,
                Some(7),
                None,
                "2025-01-05",
                AttendanceStatus::Present,
            )],
        );
        api.failing_attendance.insert(2);

        let aggregate = aggregate_attendance(&api, target(), &groups).await;

        assert_eq!(aggregate.records.len(), 1);
        assert_eq!(aggregate.failed.len(), 1);
        assert_eq!(aggregate.failed[0].group_id, 2);
        assert_eq!(aggregate.failed[0].month, None);
    }

    #[tokio::test]
    async fn records_with_unparsable_dates_are_skipped() {
        let mut api = FakeSchoolApi::new();
        let groups = vec![group_with_students(1, "Math", &["a@x.com"])];
        api.attendance.insert(
            1,
            vec![
                attendance_record(10, Some(7), None, "garbage", AttendanceStatus::Present),
                attendance_record(11, Some(7), None, "2025-01-05", AttendanceStatus::Present),
            ],
        );

        let aggregate = aggregate_attendance(&api, target(), &groups).await;

        assert_eq!(aggregate.records.len(), 1);
        assert_eq!(aggregate.records[0].id, 11);
        assert!(aggregate.failed.is_empty());
    }

    #[tokio::test]
    async fn child_targets_match_through_student_id_only() {
        let mut api = FakeSchoolApi::new();
        let groups = vec![group_with_students(1, "Math", &["a@x.com"])];
        api.attendance.insert(
            1,
            vec![
                attendance_record(10, None, Some(11), "2025-01-05", AttendanceStatus::Present),
                attendance_record(12, Some(11), None, "2025-01-12", AttendanceStatus::Present),
            ],
        );

        let child_target = TargetIdentity {
            id: 11,
            kind: TargetKind::Child,
        };
        let aggregate = aggregate_attendance(&api, child_target, &groups).await;

        assert_eq!(aggregate.records.len(), 1);
        assert_eq!(aggregate.records[0].id, 10);
    }
}
