//! Enumeration types for the Walkin queue manager.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle status of a visitor group.
///
/// Groups progress `Waiting -> InProgress -> Completed`. The ordering of the
/// variants follows that progression, so `Ord` compares how far along a
/// group is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "kebab-case")]
#[ts(export, export_to = "bindings/")]
pub enum GroupStatus {
    /// Registered and waiting in the FIFO queue.
    #[default]
    Waiting,
    /// Currently occupying an activity slot.
    InProgress,
    /// Finished with the activity.
    Completed,
}

impl GroupStatus {
    /// Wire representation (`waiting`, `in-progress`, `completed`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Whether a group in this status may be moved to `next`.
    ///
    /// Staying in place and moving forward are allowed; regressions are not.
    pub fn can_transition_to(self, next: Self) -> bool {
        next >= self
    }
}

impl core::fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&GroupStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        let parsed: GroupStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, GroupStatus::Completed);
        assert!(serde_json::from_str::<GroupStatus>("\"InProgress\"").is_err());
    }

    #[test]
    fn transitions_only_move_forward() {
        use GroupStatus::{Completed, InProgress, Waiting};
        assert!(Waiting.can_transition_to(InProgress));
        assert!(Waiting.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Waiting));
        assert!(!Completed.can_transition_to(Waiting));
        assert!(!Completed.can_transition_to(InProgress));
    }
}
