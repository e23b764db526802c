//! Queue logic for the Walkin walk-in queue manager.
//!
//! This crate holds everything that is not HTTP: configuration, the typed
//! view over stored settings, the in-memory queue store, the wait-time
//! estimator, and overdue-turn detection.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`settings`] -- Parsing and validation of the settings table
//! - [`store`] -- In-memory group, setting and staff tables
//! - [`estimator`] -- Wait-time estimation over the FIFO queue
//! - [`turns`] -- Running groups whose activity time has run out

pub mod config;
pub mod estimator;
pub mod settings;
pub mod store;
pub mod turns;

pub use config::{ConfigError, QueueConfig, WalkinConfig};
pub use estimator::{estimate, estimate_wait};
pub use settings::{QueueSettings, SettingError};
pub use store::{GroupPatch, NewGroup, QueueStore, StoreError};
pub use turns::overdue_turns;
