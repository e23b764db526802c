//! HTTP API for the Walkin walk-in queue manager.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Group endpoints** for registering visitors, moving them through
//!   `waiting -> in-progress -> completed`, and removing them
//! - **Queue views** for aggregate stats, wait estimates, and overdue turns
//! - **Admin endpoints** for the settings table and the staff roster
//!
//! # Architecture
//!
//! Handlers work against an in-memory [`QueueStore`] shared through
//! [`AppState`]. Clients poll; there is no push channel. Wait estimates
//! are computed fresh on each request from the current group list.
//!
//! [`QueueStore`]: walkin_core::QueueStore

pub mod admin;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
