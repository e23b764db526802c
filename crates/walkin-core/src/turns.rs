//! Detection of in-progress groups whose activity time has run out.
//!
//! Staff get a turn notification once a running group has been on the
//! activity for its full duration. Only groups with both a start time and an
//! assigned staff member qualify, since the notification is addressed to
//! that staff member.

use chrono::{DateTime, TimeDelta, Utc};
use walkin_types::{Group, GroupStatus, OverdueTurn};

use crate::settings::QueueSettings;

/// When a running group's turn ends, if it has started.
pub fn turn_due_at(group: &Group, settings: &QueueSettings) -> Option<DateTime<Utc>> {
    let start = group.start_time?;
    let minutes = group
        .activity_duration
        .filter(|&m| m > 0)
        .unwrap_or_else(|| settings.activity_duration.get());
    start.checked_add_signed(TimeDelta::minutes(i64::from(minutes)))
}

/// All overdue turns at `now`, earliest due first.
pub fn overdue_turns(
    groups: &[Group],
    settings: &QueueSettings,
    now: DateTime<Utc>,
) -> Vec<OverdueTurn> {
    let mut overdue: Vec<OverdueTurn> = groups
        .iter()
        .filter(|g| g.status == GroupStatus::InProgress)
        .filter_map(|g| {
            let staff_member = g.assigned_staff.as_ref()?;
            let due_at = turn_due_at(g, settings)?;
            (now >= due_at).then(|| OverdueTurn {
                group_id: g.id,
                group_name: g.display_name(),
                staff_member: staff_member.clone(),
                due_at,
                overdue_minutes: u64::try_from(
                    now.signed_duration_since(due_at).num_minutes(),
                )
                .unwrap_or(0),
            })
        })
        .collect();

    overdue.sort_by_key(|t| (t.due_at, t.group_id));
    overdue
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::QueueConfig;
    use walkin_types::GroupId;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    fn running(id: u64, started: DateTime<Utc>, staff: Option<&str>) -> Group {
        Group {
            id: GroupId(id),
            members: vec![format!("Lead {id}")],
            size: 1,
            status: GroupStatus::InProgress,
            assigned_staff: staff.map(str::to_owned),
            notes: None,
            present: true,
            registration_time: started,
            start_time: Some(started),
            end_time: None,
            queue_position: id,
            activity_duration: None,
        }
    }

    fn defaults() -> QueueSettings {
        QueueSettings::from_config(&QueueConfig::default())
    }

    #[test]
    fn group_past_its_duration_is_overdue() {
        let groups = vec![running(1, at(10, 0), Some("Jennifer Lee"))];
        let turns = overdue_turns(&groups, &defaults(), at(10, 13));
        assert_eq!(turns.len(), 1);
        let turn = turns.first().unwrap();
        assert_eq!(turn.group_id, GroupId(1));
        assert_eq!(turn.group_name, "Group #1 (Lead 1)");
        assert_eq!(turn.staff_member, "Jennifer Lee");
        assert_eq!(turn.due_at, at(10, 10));
        assert_eq!(turn.overdue_minutes, 3);
    }

    #[test]
    fn due_exactly_now_counts() {
        let groups = vec![running(1, at(10, 0), Some("David Chen"))];
        assert_eq!(overdue_turns(&groups, &defaults(), at(10, 10)).len(), 1);
        assert!(overdue_turns(&groups, &defaults(), at(10, 9)).is_empty());
    }

    #[test]
    fn unassigned_or_unstarted_groups_are_skipped() {
        let mut unstarted = running(2, at(9, 0), Some("Alex Thompson"));
        unstarted.start_time = None;
        let mut waiting = running(3, at(9, 0), Some("Alex Thompson"));
        waiting.status = GroupStatus::Waiting;
        let groups = vec![running(1, at(9, 0), None), unstarted, waiting];
        assert!(overdue_turns(&groups, &defaults(), at(12, 0)).is_empty());
    }

    #[test]
    fn own_duration_and_ordering() {
        let mut long = running(1, at(9, 0), Some("Mike Wilson"));
        long.activity_duration = Some(60);
        let short = running(2, at(9, 30), Some("Sarah Martinez"));
        let groups = vec![long, short];

        let turns = overdue_turns(&groups, &defaults(), at(10, 0));
        let ids: Vec<GroupId> = turns.iter().map(|t| t.group_id).collect();
        assert_eq!(ids, vec![GroupId(2), GroupId(1)]);
    }
}
