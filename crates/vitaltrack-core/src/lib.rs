//! # VitalTrack
//!
//! Suit and health metrics tracker.
//!
//! VitalTrack records heart rate, oxygen level, BMI and hydration readings,
//! checks each one against a healthy range and raises an alert with a
//! possible condition when a reading falls outside it.
//!
//! ## Architecture
//!
//! - **Models**: metrics, healthy ranges, readings and alerts
//! - **Alerting**: range evaluation and condition classification
//! - **Tracker**: per-session store, recording and transcripts
//! - **TUI**: terminal dashboard with charts
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard
//! vitaltrack
//!
//! # Record readings from the command line
//! vitaltrack record heart_rate=72 oxygen_level=97
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod alerting;
pub mod config;
pub mod error;
pub mod models;
pub mod tracker;
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};
pub use tracker::TrackerService;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::AlertEngine;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::tracker::{TrackerService, Transcript};
}
