//! Type-safe identifier wrappers around `u64`.
//!
//! Every record in the queue store has a strongly-typed ID so group, staff
//! and setting identifiers cannot be mixed up at compile time. IDs are
//! handed out by the store from monotonically increasing counters and
//! serialize as plain JSON numbers.

use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around `u64` with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(#[ts(type = "number")] pub u64);

        impl $name {
            /// Return the inner numeric value.
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a visitor group in the queue.
    GroupId
}

define_id! {
    /// Unique identifier for a staff member.
    StaffId
}

define_id! {
    /// Unique identifier for a stored setting row.
    SettingId
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&GroupId(7)).unwrap();
        assert_eq!(json, "7");
        let back: GroupId = serde_json::from_str("7").unwrap();
        assert_eq!(back, GroupId(7));
    }

    #[test]
    fn ids_parse_from_path_segments() {
        assert_eq!("42".parse::<StaffId>().unwrap(), StaffId(42));
        assert_eq!(" 3 ".parse::<GroupId>().unwrap(), GroupId(3));
        assert!("abc".parse::<GroupId>().is_err());
        assert!("-1".parse::<GroupId>().is_err());
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(SettingId(12).to_string(), "12");
        assert_eq!(u64::from(GroupId::from(5)), 5);
    }
}
