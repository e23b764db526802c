//! Configuration loading and typed config structures for the queue manager.
//!
//! The canonical configuration lives in `walkin-config.yaml` next to the
//! server binary. This module defines strongly-typed structs that mirror the
//! YAML structure and provides a loader that reads and validates the file.
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `walkin-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WalkinConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: HttpConfig,

    /// Queue defaults seeded into the settings table at startup.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WalkinConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `WALKIN_HOST` overrides `server.host`
    /// - `WALKIN_PORT` overrides `server.port`
    /// - `WALKIN_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without applying
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml turns an empty document into unit, which does not
        // deserialize into a struct.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `WALKIN_PORT` is not a port number.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("WALKIN_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("WALKIN_PORT") {
            self.server.port = port.trim().parse().map_err(|e| ConfigError::Invalid {
                reason: format!("WALKIN_PORT {port:?} is not a valid port: {e}"),
            })?;
        }
        if let Some(level) = lookup("WALKIN_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Check value ranges that the type system does not enforce.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.concurrent_groups == 0 {
            return Err(ConfigError::Invalid {
                reason: "queue.concurrent_groups must be at least 1".to_owned(),
            });
        }
        if self.queue.activity_duration == 0 {
            return Err(ConfigError::Invalid {
                reason: "queue.activity_duration must be at least 1 minute".to_owned(),
            });
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Queue defaults.
///
/// These seed the settings table at startup and are the fallback when a
/// stored setting is missing or cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueConfig {
    /// Maximum number of groups running the activity at once.
    #[serde(default = "default_concurrent_groups")]
    pub concurrent_groups: u32,

    /// Default minutes per turn.
    #[serde(default = "default_activity_duration")]
    pub activity_duration: u32,

    /// Staff roster created at startup.
    #[serde(default = "default_staff")]
    pub staff: Vec<String>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrent_groups: default_concurrent_groups(),
            activity_duration: default_activity_duration(),
            staff: default_staff(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive (e.g. `info,walkin_api=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log line format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

const fn default_concurrent_groups() -> u32 {
    2
}

const fn default_activity_duration() -> u32 {
    10
}

fn default_staff() -> Vec<String> {
    [
        "Mike Wilson",
        "Jennifer Lee",
        "David Chen",
        "Sarah Martinez",
        "Alex Thompson",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_log_level() -> String {
    String::from("info")
}
