//! Wait-time estimation for the walk-in queue.
//!
//! The venue runs `concurrent_groups` activity slots. The estimator models
//! them as a round-based server pool: every round (a *batch*) lets up to
//! `concurrent_groups` groups run for one activity duration, and waiting
//! groups are served strictly in `queue_position` order. This is a cheap
//! approximation rather than an event simulation, so it can be recomputed
//! on every poll.
//!
//! # Targeted estimate
//!
//! For a waiting group at zero-based index `i` in the FIFO queue, with
//! `available = max(0, concurrent - in_progress)`:
//!
//! - `i < available`: the group starts now.
//! - otherwise: `batches = ceil((i - available + 1) / concurrent)` and the
//!   wait is `batches * duration`, using the group's own duration when it
//!   has one.
//!
//! A target that is not waiting (already started, finished, or unknown)
//! gets a zero wait.
//!
//! # Next-registrant estimate
//!
//! Without a target the estimate is for a group that would join the back of
//! the queue now. While fewer than `concurrent` groups are waiting the wait
//! is zero; after that `batches = ceil((waiting - available + 1) /
//! concurrent)` rounds of the default duration.

use chrono::{DateTime, TimeDelta, TimeZone};
use walkin_types::{Group, GroupId, GroupStatus, WaitEstimate};

use crate::settings::QueueSettings;

/// Format used for the estimated clock time, e.g. `3:05 PM`.
const CLOCK_LABEL_FORMAT: &str = "%-I:%M %p";

/// Minutes until a slot frees for `target`, or for the next registrant
/// when `target` is `None`.
pub fn estimate_wait(groups: &[Group], settings: &QueueSettings, target: Option<GroupId>) -> u32 {
    let waiting = waiting_in_order(groups);
    let in_progress = count_u32(
        groups
            .iter()
            .filter(|g| g.status == GroupStatus::InProgress)
            .count(),
    );
    let concurrent = settings.concurrent_groups;
    let available = concurrent.get().saturating_sub(in_progress);

    match target {
        Some(id) => {
            let Some((index, group)) = waiting.iter().enumerate().find(|(_, g)| g.id == id) else {
                return 0;
            };
            let index = count_u32(index);
            if index < available {
                return 0;
            }
            let ahead_to_wait = index.saturating_sub(available);
            let batches = ahead_to_wait.saturating_add(1).div_ceil(concurrent.get());
            batches.saturating_mul(duration_for(group, settings))
        }
        None => {
            let total_waiting = count_u32(waiting.len());
            if total_waiting < concurrent.get() {
                return 0;
            }
            let to_wait_for = total_waiting.saturating_sub(available).saturating_add(1);
            let batches = to_wait_for.div_ceil(concurrent.get());
            batches.saturating_mul(settings.activity_duration.get())
        }
    }
}

/// Full estimate with the clock-time label computed from `now`.
pub fn estimate<Tz>(
    groups: &[Group],
    settings: &QueueSettings,
    target: Option<GroupId>,
    now: &DateTime<Tz>,
) -> WaitEstimate
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    let wait_minutes = estimate_wait(groups, settings, target);
    if wait_minutes == 0 {
        return WaitEstimate::now();
    }

    let estimated_time = now
        .clone()
        .checked_add_signed(TimeDelta::minutes(i64::from(wait_minutes)))
        .map_or_else(|| WaitEstimate::NOW.to_owned(), |at| clock_label(&at));

    WaitEstimate {
        wait_minutes,
        estimated_time,
    }
}

/// Render a timestamp as a 12-hour clock label such as `3:05 PM`.
pub fn clock_label<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    at.format(CLOCK_LABEL_FORMAT).to_string()
}

/// Waiting groups in FIFO order.
pub fn waiting_in_order(groups: &[Group]) -> Vec<&Group> {
    let mut waiting: Vec<&Group> = groups
        .iter()
        .filter(|g| g.status == GroupStatus::Waiting)
        .collect();
    waiting.sort_by_key(|g| (g.queue_position, g.id));
    waiting
}

/// A group's own duration, or the default when unset or zero.
fn duration_for(group: &Group, settings: &QueueSettings) -> u32 {
    group
        .activity_duration
        .filter(|&minutes| minutes > 0)
        .unwrap_or_else(|| settings.activity_duration.get())
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
