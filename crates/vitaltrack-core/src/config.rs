//! Configuration management for VitalTrack

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{HealthyRange, RangeTable};

/// Prefix for environment overrides, e.g. `VITALTRACK__TUI__TICK_RATE_MS`
pub const ENV_PREFIX: &str = "VITALTRACK";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker configuration
    pub tracker: TrackerConfig,

    /// TUI configuration
    pub tui: TuiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load defaults, the user config file, an explicit file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layers(default_config_file().as_deref(), path)
    }

    /// Load from a single file plus the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load_layers(None, Some(path))
    }

    fn load_layers(user_file: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(file) = user_file {
            builder = builder.add_source(config::File::from(file).required(false));
        }
        if let Some(file) = explicit {
            tracing::info!(path = %file.display(), "Loading configuration file");
            builder = builder.add_source(config::File::from(file).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would fail later at runtime
    pub fn validate(&self) -> Result<()> {
        RangeTable::with_overrides(&self.tracker.ranges)?;
        if self.tui.tick_rate_ms == 0 {
            return Err(Error::config("tui.tick_rate_ms must be greater than zero"));
        }
        Ok(())
    }
}

/// Tracker configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Healthy range overrides keyed by metric name (`heart_rate`, `bmi`, ...)
    pub ranges: BTreeMap<String, HealthyRange>,
}

/// TUI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Event poll / redraw interval in milliseconds
    pub tick_rate_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format
    pub format: LogFormat,
    /// Directory for the dashboard log file
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

impl LoggingConfig {
    /// Directory for log files, falling back to the platform data dir
    pub fn log_directory(&self) -> PathBuf {
        self.directory
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_local_dir().join("logs")))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Create the log directory if needed and return it
    pub fn create_log_directory(&self) -> Result<PathBuf> {
        let directory = self.log_directory();
        std::fs::create_dir_all(&directory)?;
        Ok(directory)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "vitaltrack")
}

/// Platform config file, e.g. `~/.config/vitaltrack/config.toml`
pub fn default_config_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
