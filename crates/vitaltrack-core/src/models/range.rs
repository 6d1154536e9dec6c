//! Healthy range configuration

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::alert::Deviation;
use super::metric::MetricKind;
use crate::error::{Error, Result};

/// Inclusive `[min, max]` interval considered healthy for a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthyRange {
    /// Lowest healthy value
    pub min: f64,
    /// Highest healthy value
    pub max: f64,
}

impl HealthyRange {
    /// Create a range, rejecting `min >= max` and non-finite bounds
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::config(format!(
                "range bounds must be finite (got {min} to {max})"
            )));
        }
        if min >= max {
            return Err(Error::config(format!(
                "range minimum {min} must be below maximum {max}"
            )));
        }
        Ok(Self { min, max })
    }

    /// Whether the value lies inside the range, bounds included
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Which side of the range the value falls on, if outside
    pub fn deviation(&self, value: f64) -> Option<Deviation> {
        if value < self.min {
            Some(Deviation::Below)
        } else if value > self.max {
            Some(Deviation::Above)
        } else {
            None
        }
    }
}

impl fmt::Display for HealthyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}

/// Lookup of healthy bounds for every metric
#[derive(Debug, Clone, PartialEq)]
pub struct RangeTable {
    ranges: [HealthyRange; 4],
}

impl Default for RangeTable {
    fn default() -> Self {
        Self {
            ranges: [
                // beats per minute
                HealthyRange { min: 60.0, max: 100.0 },
                // percent saturation
                HealthyRange { min: 95.0, max: 100.0 },
                HealthyRange { min: 18.5, max: 24.9 },
                // percent, conceptual
                HealthyRange { min: 45.0, max: 75.0 },
            ],
        }
    }
}

impl RangeTable {
    /// Build the table from the defaults plus configured overrides keyed by metric name
    pub fn with_overrides(overrides: &BTreeMap<String, HealthyRange>) -> Result<Self> {
        let mut table = Self::default();
        for (name, range) in overrides {
            let metric: MetricKind = name
                .parse()
                .map_err(|e| Error::config(format!("ranges.{name}: {e}")))?;
            let checked = HealthyRange::new(range.min, range.max)
                .map_err(|e| Error::config(format!("ranges.{}: {e}", metric.key())))?;
            tracing::info!(metric = metric.key(), min = checked.min, max = checked.max, "Overriding healthy range");
            table.ranges[metric.index()] = checked;
        }
        Ok(table)
    }

    /// Bounds for a metric
    pub fn bounds_for(&self, metric: MetricKind) -> HealthyRange {
        self.ranges[metric.index()]
    }

    /// Bounds for a metric given by name
    pub fn bounds_for_name(&self, name: &str) -> Result<HealthyRange> {
        let metric: MetricKind = name.parse()?;
        Ok(self.bounds_for(metric))
    }

    /// Iterate `(metric, range)` in display order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, HealthyRange)> + '_ {
        MetricKind::ALL.into_iter().map(|metric| (metric, self.bounds_for(metric)))
    }
}
