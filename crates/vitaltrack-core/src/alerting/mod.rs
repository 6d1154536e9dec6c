//! Alerting for VitalTrack
//!
//! Classifies out-of-range readings into named conditions.

mod evaluator;

pub use evaluator::AlertEngine;
