//! Shared type definitions for the Walkin queue manager.
//!
//! This crate is the single source of truth for the records passed between
//! the queue store, the wait-time estimator, and the HTTP API. Types flow
//! downstream to `TypeScript` via `ts-rs` for the queue UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe numeric wrappers for record identifiers
//! - [`enums`] -- Group lifecycle status
//! - [`structs`] -- Groups, staff, settings and derived queue views

pub mod enums;
pub mod ids;
pub mod structs;

pub use enums::GroupStatus;
pub use ids::{GroupId, SettingId, StaffId};
pub use structs::{Group, OverdueTurn, QueueStats, Setting, Staff, WaitEstimate};
