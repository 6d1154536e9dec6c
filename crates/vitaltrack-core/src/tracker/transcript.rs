//! Transcript of the latest value of every metric

use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::store::MetricStore;

/// Header line of every transcript
pub const TRANSCRIPT_HEADER: &str = "Health and Suit Metrics Transcript";

/// Sentinel for metrics with no readings
pub const NO_DATA: &str = "N/A";

/// Timestamp format used in transcripts and charts
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One `label: value` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    /// Title-cased metric name
    pub label: String,
    /// Latest value or `N/A`
    pub value: String,
}

/// Summary of the latest readings at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    /// When the transcript was generated
    pub generated_at: DateTime<Local>,
    /// One line per metric in display order
    pub lines: Vec<TranscriptLine>,
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TRANSCRIPT_HEADER}")?;
        writeln!(f, "Timestamp: {}", self.generated_at.format(TIMESTAMP_FORMAT))?;
        for line in &self.lines {
            writeln!(f, "{}: {}", line.label, line.value)?;
        }
        Ok(())
    }
}

/// Read-only projection of a store into transcript lines
pub struct SummaryFormatter;

impl SummaryFormatter {
    /// Latest value of each metric, `N/A` when a series is empty
    pub fn render(store: &MetricStore) -> Vec<TranscriptLine> {
        store
            .iter()
            .map(|(metric, series)| TranscriptLine {
                label: metric.title(),
                value: series
                    .latest()
                    .map_or_else(|| NO_DATA.to_string(), |r| r.display_value()),
            })
            .collect()
    }
}
