//! Shared application state for the queue API server.
//!
//! [`AppState`] holds the in-memory [`QueueStore`] behind a read-write lock
//! together with the configured queue defaults. Every handler takes the
//! lock for the duration of its store access, so requests against the
//! store are serialized and never observe a half-applied update.

use std::sync::Arc;

use tokio::sync::RwLock;
use walkin_core::{QueueConfig, QueueSettings, QueueStore};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Group, setting and staff tables.
    pub store: Arc<RwLock<QueueStore>>,
    /// Fallback values for settings that are missing or malformed.
    pub defaults: QueueConfig,
}

impl AppState {
    /// Create state with a store seeded from `defaults`.
    pub fn new(defaults: QueueConfig) -> Self {
        let store = QueueStore::seeded(&defaults);
        Self::with_store(store, defaults)
    }

    /// Create state around an existing store.
    pub fn with_store(store: QueueStore, defaults: QueueConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            defaults,
        }
    }

    /// Parse the current settings table.
    pub async fn queue_settings(&self) -> QueueSettings {
        self.store.read().await.queue_settings(&self.defaults)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}
