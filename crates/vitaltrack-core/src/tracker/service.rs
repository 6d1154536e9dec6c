//! Recording and query entry point

use std::collections::BTreeMap;

use chrono::{DateTime, Local, SubsecRound};
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::store::MetricStore;
use super::transcript::{SummaryFormatter, Transcript};
use crate::alerting::AlertEngine;
use crate::config::TrackerConfig;
use crate::error::{Error, Result};
use crate::models::{Alert, MetricKind, RangeTable, Reading, RecordOutcome};

/// Owns the metric store and the range table for one tracking session
///
/// Writers are serialized by the store lock; readers get cloned snapshots.
#[derive(Debug, Default)]
pub struct TrackerService {
    ranges: RangeTable,
    store: RwLock<MetricStore>,
}

impl TrackerService {
    /// Create a tracker with the default healthy ranges
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with a custom range table
    pub fn with_ranges(ranges: RangeTable) -> Self {
        Self {
            ranges,
            store: RwLock::new(MetricStore::new()),
        }
    }

    /// Create a tracker from configuration
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        Ok(Self::with_ranges(RangeTable::with_overrides(&config.ranges)?))
    }

    /// Healthy ranges in effect
    pub fn ranges(&self) -> &RangeTable {
        &self.ranges
    }

    /// Parse, store and check a raw value
    ///
    /// Invalid input is rejected before anything is stored.
    pub fn record(&self, metric: MetricKind, raw_value: &str) -> Result<RecordOutcome> {
        let value = match parse_value(metric, raw_value) {
            Ok(value) => value,
            Err(e) => {
                warn!(metric = metric.key(), raw = raw_value, "Rejected reading");
                return Err(e);
            }
        };

        let reading = {
            let mut store = self.store.write();
            store.append(metric, now(), value).clone()
        };

        let alert = self.evaluate(metric, value);
        if let Some(alert) = &alert {
            warn!(
                metric = metric.key(),
                value,
                condition = alert.condition.as_str(),
                "Reading outside healthy range"
            );
        } else {
            debug!(metric = metric.key(), value, "Reading within healthy range");
        }

        Ok(RecordOutcome {
            metric,
            reading,
            alert,
        })
    }

    /// Record a value for a metric given by name
    pub fn record_named(&self, metric: &str, raw_value: &str) -> Result<RecordOutcome> {
        let metric: MetricKind = metric.parse()?;
        self.record(metric, raw_value)
    }

    /// Check a value without storing it
    pub fn evaluate(&self, metric: MetricKind, value: f64) -> Option<Alert> {
        AlertEngine::new(&self.ranges).evaluate(metric, value)
    }

    /// Parse and check a raw value without storing it
    pub fn check(&self, metric: MetricKind, raw_value: &str) -> Result<Option<Alert>> {
        let value = parse_value(metric, raw_value)?;
        Ok(self.evaluate(metric, value))
    }

    /// Readings for one metric in recording order
    pub fn series_for(&self, metric: MetricKind) -> Vec<Reading> {
        self.store.read().series_for(metric).as_slice().to_vec()
    }

    /// Readings for every metric, including those never recorded
    pub fn all_series(&self) -> BTreeMap<MetricKind, Vec<Reading>> {
        self.store
            .read()
            .iter()
            .map(|(metric, series)| (metric, series.as_slice().to_vec()))
            .collect()
    }

    /// Latest reading of a metric
    pub fn latest(&self, metric: MetricKind) -> Option<Reading> {
        self.store.read().series_for(metric).latest().cloned()
    }

    /// Summary of the latest value of every metric
    pub fn transcript(&self) -> Transcript {
        let lines = SummaryFormatter::render(&self.store.read());
        Transcript {
            generated_at: now(),
            lines,
        }
    }

    /// Total readings recorded this session
    pub fn reading_count(&self) -> usize {
        self.store.read().len()
    }
}

/// Current local time truncated to whole seconds
fn now() -> DateTime<Local> {
    Local::now().trunc_subsecs(0)
}

/// Parse a raw reading, accepting surrounding whitespace
fn parse_value(metric: MetricKind, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::invalid_value(metric, raw))
}
