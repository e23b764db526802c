//! In-memory queue store.
//!
//! [`QueueStore`] owns the group, setting and staff tables for the lifetime
//! of the process. Each table is a `BTreeMap` keyed by id (or key, for
//! settings) with an explicit counter for the next id. Nothing is persisted.
//!
//! The store does no field validation; the API layer checks payloads before
//! calling in. Group updates are a shallow merge of the supplied fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use walkin_types::{
    Group, GroupId, GroupStatus, QueueStats, Setting, SettingId, Staff, StaffId,
};

use crate::config::QueueConfig;
use crate::settings::{self, QueueSettings};

/// Errors raised by store operations that enforce uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A staff member with this name already exists.
    #[error("staff member {name:?} already exists")]
    DuplicateStaff {
        /// The conflicting name.
        name: String,
    },
}

/// Fields for a new group. The store assigns the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGroup {
    /// Member names.
    pub members: Vec<String>,
    /// Initial status, normally `Waiting`.
    pub status: GroupStatus,
    /// Assigned staff label.
    pub assigned_staff: Option<String>,
    /// Staff notes.
    pub notes: Option<String>,
    /// Checked in at the venue.
    pub present: bool,
    /// Explicit start time.
    pub start_time: Option<DateTime<Utc>>,
    /// Explicit end time.
    pub end_time: Option<DateTime<Utc>>,
    /// Per-group duration in minutes.
    pub activity_duration: Option<u32>,
}

/// Partial update for a group.
///
/// `None` leaves a field untouched. For nullable fields `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupPatch {
    /// Replacement member list; `size` follows it.
    pub members: Option<Vec<String>>,
    /// New status.
    pub status: Option<GroupStatus>,
    /// New staff label.
    pub assigned_staff: Option<Option<String>>,
    /// New notes.
    pub notes: Option<Option<String>>,
    /// New check-in flag.
    pub present: Option<bool>,
    /// New start time.
    pub start_time: Option<Option<DateTime<Utc>>>,
    /// New end time.
    pub end_time: Option<Option<DateTime<Utc>>>,
    /// New per-group duration.
    pub activity_duration: Option<Option<u32>>,
}

/// Process-lifetime store for groups, settings and staff.
#[derive(Debug, Clone)]
pub struct QueueStore {
    groups: BTreeMap<GroupId, Group>,
    settings: BTreeMap<String, Setting>,
    staff: BTreeMap<StaffId, Staff>,
    next_group_id: u64,
    next_setting_id: u64,
    next_staff_id: u64,
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QueueStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
            settings: BTreeMap::new(),
            staff: BTreeMap::new(),
            next_group_id: 1,
            next_setting_id: 1,
            next_staff_id: 1,
        }
    }

    /// A store with the default settings and staff roster written in.
    pub fn seeded(config: &QueueConfig) -> Self {
        let mut store = Self::new();
        store.set_setting(settings::CONCURRENT_GROUPS, &config.concurrent_groups.to_string());
        store.set_setting(settings::ACTIVITY_DURATION, &config.activity_duration.to_string());
        store.set_setting(settings::IS_BREAK_TIME, "false");
        store.set_setting(settings::BREAK_START_TIME, "");
        store.set_setting(settings::BREAK_END_TIME, "");

        for name in &config.staff {
            if let Err(e) = store.create_staff(name) {
                tracing::warn!(error = %e, "skipping duplicate staff entry in config");
            }
        }

        debug!(
            settings = store.settings.len(),
            staff = store.staff.len(),
            "queue store seeded"
        );
        store
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    /// All groups, ordered by queue position.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.values().cloned().collect();
        groups.sort_by_key(|g| (g.queue_position, g.id));
        groups
    }

    /// A single group.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    /// Waiting groups in FIFO order.
    pub fn waiting_groups(&self) -> Vec<Group> {
        let mut waiting: Vec<Group> = self
            .groups
            .values()
            .filter(|g| g.status == GroupStatus::Waiting)
            .cloned()
            .collect();
        waiting.sort_by_key(|g| (g.queue_position, g.id));
        waiting
    }

    /// Running groups, earliest start first. Groups without a start time
    /// sort ahead of the rest.
    pub fn in_progress_groups(&self) -> Vec<Group> {
        let mut running: Vec<Group> = self
            .groups
            .values()
            .filter(|g| g.status == GroupStatus::InProgress)
            .cloned()
            .collect();
        running.sort_by_key(|g| (g.start_time, g.id));
        running
    }

    /// Register a group at the back of the queue.
    pub fn create_group(&mut self, new: NewGroup, now: DateTime<Utc>) -> Group {
        let id = GroupId(self.next_group_id);
        self.next_group_id = self.next_group_id.saturating_add(1);

        let queue_position = self.next_queue_position();
        let group = Group {
            id,
            size: len_u64(new.members.len()),
            members: new.members,
            status: new.status,
            assigned_staff: new.assigned_staff,
            notes: new.notes,
            present: new.present,
            registration_time: now,
            start_time: new.start_time,
            end_time: new.end_time,
            queue_position,
            activity_duration: new.activity_duration,
        };

        debug!(group_id = %id, queue_position, size = group.size, "group registered");
        self.groups.insert(id, group.clone());
        group
    }

    /// Merge `patch` into an existing group.
    ///
    /// Returns `None` when the id is unknown.
    pub fn update_group(&mut self, id: GroupId, patch: GroupPatch) -> Option<Group> {
        let group = self.groups.get_mut(&id)?;

        if let Some(members) = patch.members {
            group.size = len_u64(members.len());
            group.members = members;
        }
        if let Some(status) = patch.status {
            group.status = status;
        }
        if let Some(assigned_staff) = patch.assigned_staff {
            group.assigned_staff = assigned_staff;
        }
        if let Some(notes) = patch.notes {
            group.notes = notes;
        }
        if let Some(present) = patch.present {
            group.present = present;
        }
        if let Some(start_time) = patch.start_time {
            group.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            group.end_time = end_time;
        }
        if let Some(activity_duration) = patch.activity_duration {
            group.activity_duration = activity_duration;
        }

        debug!(group_id = %id, status = %group.status, "group updated");
        Some(group.clone())
    }

    /// Remove a group. Returns whether it existed.
    pub fn delete_group(&mut self, id: GroupId) -> bool {
        let removed = self.groups.remove(&id).is_some();
        if removed {
            debug!(group_id = %id, "group deleted");
        }
        removed
    }

    fn next_queue_position(&self) -> u64 {
        self.groups
            .values()
            .map(|g| g.queue_position)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Aggregate counts over every group.
    pub fn stats(&self) -> QueueStats {
        self.groups
            .values()
            .fold(QueueStats::default(), |mut stats, g| {
                stats.total_visitors = stats.total_visitors.saturating_add(g.size);
                stats.total_groups = stats.total_groups.saturating_add(1);
                match g.status {
                    GroupStatus::Waiting => {
                        stats.groups_in_queue = stats.groups_in_queue.saturating_add(1);
                    }
                    GroupStatus::InProgress => {
                        stats.groups_in_progress = stats.groups_in_progress.saturating_add(1);
                    }
                    GroupStatus::Completed => {
                        stats.completed_today = stats.completed_today.saturating_add(1);
                    }
                }
                stats
            })
    }

    // -----------------------------------------------------------------------
    // Settings
    // -----------------------------------------------------------------------

    /// A single setting row.
    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.settings.get(key)
    }

    /// All setting rows, ordered by id.
    pub fn settings(&self) -> Vec<Setting> {
        let mut rows: Vec<Setting> = self.settings.values().cloned().collect();
        rows.sort_by_key(|s| s.id);
        rows
    }

    /// Insert or replace a setting. The row keeps its id across updates.
    pub fn set_setting(&mut self, key: &str, value: &str) -> Setting {
        if let Some(existing) = self.settings.get_mut(key) {
            existing.value = value.to_owned();
            return existing.clone();
        }

        let setting = Setting {
            id: SettingId(self.next_setting_id),
            key: key.to_owned(),
            value: value.to_owned(),
        };
        self.next_setting_id = self.next_setting_id.saturating_add(1);
        self.settings.insert(key.to_owned(), setting.clone());
        setting
    }

    /// Parsed queue settings with `defaults` filling any gaps.
    pub fn queue_settings(&self, defaults: &QueueConfig) -> QueueSettings {
        QueueSettings::from_settings(self.settings.values(), defaults)
    }

    // -----------------------------------------------------------------------
    // Staff
    // -----------------------------------------------------------------------

    /// The roster, ordered by id.
    pub fn staff(&self) -> Vec<Staff> {
        self.staff.values().cloned().collect()
    }

    /// Add a staff member.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateStaff`] if the name is taken.
    pub fn create_staff(&mut self, name: &str) -> Result<Staff, StoreError> {
        if self.staff.values().any(|s| s.name == name) {
            return Err(StoreError::DuplicateStaff {
                name: name.to_owned(),
            });
        }

        let staff = Staff {
            id: StaffId(self.next_staff_id),
            name: name.to_owned(),
        };
        self.next_staff_id = self.next_staff_id.saturating_add(1);
        self.staff.insert(staff.id, staff.clone());
        Ok(staff)
    }

    /// Remove a staff member. Groups keep their `assigned_staff` label.
    pub fn delete_staff(&mut self, id: StaffId) -> bool {
        self.staff.remove(&id).is_some()
    }
}

fn len_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
