//! Metric tracking for VitalTrack
//!
//! The tracker records readings into an append-only store, checks each one
//! against its healthy range and renders summaries of what was recorded.

mod service;
mod store;
mod transcript;

pub use service::TrackerService;
pub use store::MetricStore;
pub use transcript::{
    SummaryFormatter, Transcript, TranscriptLine, NO_DATA, TIMESTAMP_FORMAT, TRANSCRIPT_HEADER,
};
