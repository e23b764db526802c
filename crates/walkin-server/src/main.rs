//! Server binary for the Walkin walk-in queue manager.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `walkin-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Seed the in-memory queue store with default settings and staff
//! 4. Serve the queue API until `Ctrl-C`

mod error;

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use walkin_api::{AppState, ServerConfig};
use walkin_core::config::{LogFormat, LoggingConfig, WalkinConfig};

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "walkin-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging setup, or the server fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = load_config()?;
    init_tracing(&config.logging)?;

    info!(
        host = config.server.host,
        port = config.server.port,
        concurrent_groups = config.queue.concurrent_groups,
        activity_duration = config.queue.activity_duration,
        staff = config.queue.staff.len(),
        "walkin-server starting"
    );

    let state = Arc::new(AppState::new(config.queue.clone()));
    info!("queue store seeded");

    let server_config = ServerConfig::from(&config.server);
    walkin_api::start_server(&server_config, state).await?;

    info!("walkin-server shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults with
/// environment overrides when the file does not exist.
fn load_config() -> Result<WalkinConfig, AppError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        return Ok(WalkinConfig::from_file(config_path)?);
    }

    let mut config = WalkinConfig::default();
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| AppError::Logging {
            message: format!("invalid log level {:?}: {e}", logging.level),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}
