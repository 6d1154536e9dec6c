//! Error types for VitalTrack

use thiserror::Error;

use crate::models::MetricKind;

/// Result type alias using VitalTrack's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for VitalTrack operations
#[derive(Error, Debug)]
pub enum Error {
    /// Metric name outside the tracked set
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Raw reading that is not a finite number
    #[error("Invalid value for {metric}: '{raw}' is not a number")]
    InvalidValue {
        /// Metric the value was entered for
        metric: MetricKind,
        /// The rejected input
        raw: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal UI error
    #[error("Terminal error: {0}")]
    Tui(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unknown metric error
    pub fn unknown_metric(name: impl Into<String>) -> Self {
        Self::UnknownMetric(name.into())
    }

    /// Create an invalid value error
    pub fn invalid_value(metric: MetricKind, raw: impl Into<String>) -> Self {
        Self::InvalidValue {
            metric,
            raw: raw.into(),
        }
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a terminal error
    pub fn tui(msg: impl Into<String>) -> Self {
        Self::Tui(msg.into())
    }

    /// Whether this error came from user input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownMetric(_) | Self::InvalidValue { .. })
    }
}
