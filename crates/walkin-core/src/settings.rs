//! Typed view over the string-keyed settings table.
//!
//! The store keeps settings as raw text. [`QueueSettings`] parses the keys
//! the queue cares about once per request and falls back to the configured
//! defaults when a value is missing or malformed, so the estimator never
//! sees a zero concurrency limit or duration.

use std::num::NonZeroU32;

use chrono::NaiveTime;
use walkin_types::Setting;

use crate::config::QueueConfig;

/// Maximum number of groups that may be in progress at once.
pub const CONCURRENT_GROUPS: &str = "concurrentGroups";
/// Default minutes per turn.
pub const ACTIVITY_DURATION: &str = "activityDuration";
/// `"true"` while staff are on break.
pub const IS_BREAK_TIME: &str = "isBreakTime";
/// Scheduled break start, `HH:MM` or empty.
pub const BREAK_START_TIME: &str = "breakStartTime";
/// Scheduled break end, `HH:MM` or empty.
pub const BREAK_END_TIME: &str = "breakEndTime";

const CLOCK_FORMAT: &str = "%H:%M";

/// Errors from validating a setting value before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingError {
    /// The key needs a whole number of at least 1.
    #[error("{key} must be a positive whole number, got {value:?}")]
    NotPositiveInteger {
        /// Setting key.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// The key needs `true` or `false`.
    #[error("{key} must be \"true\" or \"false\", got {value:?}")]
    NotBoolean {
        /// Setting key.
        key: String,
        /// Rejected value.
        value: String,
    },

    /// The key needs an `HH:MM` clock time or an empty string.
    #[error("{key} must be an HH:MM time or empty, got {value:?}")]
    NotClockTime {
        /// Setting key.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Check a value for one of the well-known keys.
///
/// Unknown keys are free text and always pass.
///
/// # Errors
///
/// Returns the [`SettingError`] matching the key's expected format.
pub fn validate_setting(key: &str, value: &str) -> Result<(), SettingError> {
    match key {
        CONCURRENT_GROUPS | ACTIVITY_DURATION => parse_positive(value)
            .map(drop)
            .ok_or_else(|| SettingError::NotPositiveInteger {
                key: key.to_owned(),
                value: value.to_owned(),
            }),
        IS_BREAK_TIME => parse_bool(value)
            .map(drop)
            .ok_or_else(|| SettingError::NotBoolean {
                key: key.to_owned(),
                value: value.to_owned(),
            }),
        BREAK_START_TIME | BREAK_END_TIME => {
            if value.trim().is_empty() || parse_clock(value).is_some() {
                Ok(())
            } else {
                Err(SettingError::NotClockTime {
                    key: key.to_owned(),
                    value: value.to_owned(),
                })
            }
        }
        _ => Ok(()),
    }
}

/// Parsed queue settings passed to the estimator and handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSettings {
    /// Number of activity slots.
    pub concurrent_groups: NonZeroU32,
    /// Default minutes per turn.
    pub activity_duration: NonZeroU32,
    /// Manual break toggle.
    pub is_break_time: bool,
    /// Scheduled break start.
    pub break_start: Option<NaiveTime>,
    /// Scheduled break end.
    pub break_end: Option<NaiveTime>,
}

impl QueueSettings {
    /// Settings built from configuration alone.
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            concurrent_groups: NonZeroU32::new(config.concurrent_groups)
                .unwrap_or(NonZeroU32::MIN),
            activity_duration: NonZeroU32::new(config.activity_duration)
                .unwrap_or(NonZeroU32::MIN),
            is_break_time: false,
            break_start: None,
            break_end: None,
        }
    }

    /// Parse stored settings, falling back to `defaults` key by key.
    pub fn from_settings<'a, I>(settings: I, defaults: &QueueConfig) -> Self
    where
        I: IntoIterator<Item = &'a Setting>,
    {
        let mut parsed = Self::from_config(defaults);

        for setting in settings {
            let value = setting.value.as_str();
            match setting.key.as_str() {
                CONCURRENT_GROUPS => match parse_positive(value) {
                    Some(n) => parsed.concurrent_groups = n,
                    None => warn_fallback(&setting.key, value),
                },
                ACTIVITY_DURATION => match parse_positive(value) {
                    Some(n) => parsed.activity_duration = n,
                    None => warn_fallback(&setting.key, value),
                },
                IS_BREAK_TIME => match parse_bool(value) {
                    Some(b) => parsed.is_break_time = b,
                    None => warn_fallback(&setting.key, value),
                },
                BREAK_START_TIME => parsed.break_start = parse_clock(value),
                BREAK_END_TIME => parsed.break_end = parse_clock(value),
                _ => {}
            }
        }

        parsed
    }

    /// Whether the venue is on break at the given local time.
    ///
    /// True when the manual toggle is on, or when `at` falls inside the
    /// scheduled `[start, end)` window. A window whose end is before its
    /// start wraps past midnight.
    pub fn on_break_at(&self, at: NaiveTime) -> bool {
        if self.is_break_time {
            return true;
        }
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) if start <= end => at >= start && at < end,
            (Some(start), Some(end)) => at >= start || at < end,
            _ => false,
        }
    }
}

fn parse_positive(value: &str) -> Option<NonZeroU32> {
    value.trim().parse::<NonZeroU32>().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_FORMAT).ok()
}

fn warn_fallback(key: &str, value: &str) {
    tracing::warn!(key, value, "unparsable setting, using configured default");
}
