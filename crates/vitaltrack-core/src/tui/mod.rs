//! Terminal User Interface for VitalTrack
//!
//! Interactive dashboard for entering readings, viewing alerts and charting
//! each metric against its healthy range.

mod app;
mod chart;
mod components;
mod event;
mod ui;

pub use app::{App, Popup, PopupKind, View};
pub use event::{Event, EventHandler};
