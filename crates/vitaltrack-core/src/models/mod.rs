//! Data models for VitalTrack

mod alert;
mod metric;
mod range;
mod reading;

pub use alert::*;
pub use metric::*;
pub use range::*;
pub use reading::*;
