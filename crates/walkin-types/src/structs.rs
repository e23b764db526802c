//! Record structs shared between the store, the estimator, and the API.
//!
//! All structs serialize with `camelCase` field names, which is the shape
//! the queue UI consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::GroupStatus;
use crate::ids::{GroupId, SettingId, StaffId};

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A visitor party that is waiting for, running, or done with the activity.
///
/// `id`, `registration_time` and `queue_position` are assigned once by the
/// store and never change. `queue_position` is the FIFO key among waiting
/// groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Names of the people in the party, in registration order.
    pub members: Vec<String>,
    /// Number of members. Always equal to `members.len()`.
    #[ts(type = "number")]
    pub size: u64,
    /// Current lifecycle status.
    pub status: GroupStatus,
    /// Name of the staff member running this group, if any.
    ///
    /// A free-text label, not a reference: removing the staff member does
    /// not touch the group.
    pub assigned_staff: Option<String>,
    /// Free-form staff notes.
    pub notes: Option<String>,
    /// Whether the party has checked in at the venue.
    pub present: bool,
    /// When the group registered.
    pub registration_time: DateTime<Utc>,
    /// When the group started the activity.
    pub start_time: Option<DateTime<Utc>>,
    /// When the group finished the activity.
    pub end_time: Option<DateTime<Utc>>,
    /// FIFO order key, `max + 1` at creation.
    #[ts(type = "number")]
    pub queue_position: u64,
    /// Minutes this group occupies a slot. `None` falls back to the
    /// venue-wide default.
    pub activity_duration: Option<u32>,
}

impl Group {
    /// Human-readable label used in notifications.
    pub fn display_name(&self) -> String {
        let lead = self.members.first().map_or("Unknown", String::as_str);
        format!("Group #{} ({lead})", self.id)
    }
}

// ---------------------------------------------------------------------------
// Staff and settings
// ---------------------------------------------------------------------------

/// A staff member who can be assigned to groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Staff {
    /// Unique staff identifier.
    pub id: StaffId,
    /// Display name, unique across the roster.
    pub name: String,
}

/// A string-keyed configuration row.
///
/// Values are stored as text; callers parse the keys they care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Setting {
    /// Row identifier.
    pub id: SettingId,
    /// Setting key (e.g. `concurrentGroups`).
    pub key: String,
    /// Raw setting value.
    pub value: String,
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Aggregate counts over the whole group table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct QueueStats {
    /// Sum of all group sizes, regardless of status.
    #[ts(type = "number")]
    pub total_visitors: u64,
    /// Groups with status `waiting`.
    #[ts(type = "number")]
    pub groups_in_queue: u64,
    /// Groups with status `in-progress`.
    #[ts(type = "number")]
    pub groups_in_progress: u64,
    /// Groups with status `completed`.
    #[ts(type = "number")]
    pub completed_today: u64,
    /// All groups in the store.
    #[ts(type = "number")]
    pub total_groups: u64,
}

/// Result of a wait-time estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WaitEstimate {
    /// Minutes until a slot is expected to be free.
    pub wait_minutes: u32,
    /// Clock time (`3:05 PM`) when the slot frees, or `Now`.
    pub estimated_time: String,
}

impl WaitEstimate {
    /// Label used when no wait is expected.
    pub const NOW: &'static str = "Now";

    /// An estimate with no wait.
    pub fn now() -> Self {
        Self {
            wait_minutes: 0,
            estimated_time: Self::NOW.to_owned(),
        }
    }

    /// Whether the group can start right away.
    pub const fn is_immediate(&self) -> bool {
        self.wait_minutes == 0
    }
}

/// An in-progress group that has used up its activity time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct OverdueTurn {
    /// The overdue group.
    pub group_id: GroupId,
    /// Display label, `Group #<id> (<first member>)`.
    pub group_name: String,
    /// Staff member assigned to the group.
    pub staff_member: String,
    /// When the group's activity time ran out.
    pub due_at: DateTime<Utc>,
    /// Whole minutes elapsed since `due_at`.
    #[ts(type = "number")]
    pub overdue_minutes: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_group() -> Group {
        Group {
            id: GroupId(3),
            members: vec!["Ana".to_owned(), "Ben".to_owned()],
            size: 2,
            status: GroupStatus::InProgress,
            assigned_staff: Some("Mike Wilson".to_owned()),
            notes: None,
            present: true,
            registration_time: DateTime::<Utc>::UNIX_EPOCH,
            start_time: None,
            end_time: None,
            queue_position: 1,
            activity_duration: Some(15),
        }
    }

    #[test]
    fn group_serializes_in_camel_case() {
        let json = serde_json::to_value(sample_group()).unwrap();
        assert_eq!(json["queuePosition"], 1);
        assert_eq!(json["assignedStaff"], "Mike Wilson");
        assert_eq!(json["activityDuration"], 15);
        assert_eq!(json["status"], "in-progress");
        assert!(json["startTime"].is_null());
        assert!(json.get("queue_position").is_none());
    }

    #[test]
    fn display_name_uses_first_member() {
        let mut group = sample_group();
        assert_eq!(group.display_name(), "Group #3 (Ana)");
        group.members.clear();
        assert_eq!(group.display_name(), "Group #3 (Unknown)");
    }

    #[test]
    fn immediate_estimate_is_labelled_now() {
        let estimate = WaitEstimate::now();
        assert!(estimate.is_immediate());
        assert_eq!(estimate.estimated_time, "Now");
    }
}
