//! In-memory, append-only metric storage

use chrono::{DateTime, Local};
use tracing::debug;

use crate::models::{MetricKind, Reading, Series};

/// One append-only series per metric
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    series: [Series; 4],
}

impl MetricStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reading to a metric's series
    ///
    /// Callers pass timestamps captured at call time; ordering is not checked.
    pub fn append(&mut self, metric: MetricKind, timestamp: DateTime<Local>, value: f64) -> &Reading {
        let series = &mut self.series[metric.index()];
        series.push(Reading { timestamp, value });
        debug!(metric = metric.key(), value, len = series.len(), "Appended reading");
        // just pushed, so never empty
        &series.as_slice()[series.len() - 1]
    }

    /// Series for a metric, empty if never recorded
    pub fn series_for(&self, metric: MetricKind) -> &Series {
        &self.series[metric.index()]
    }

    /// Iterate every metric and its series in display order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKind, &Series)> + '_ {
        MetricKind::ALL
            .into_iter()
            .map(move |metric| (metric, self.series_for(metric)))
    }

    /// Total readings across all metrics
    pub fn len(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }

    /// Whether no metric has any reading
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(Series::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_store_is_empty() {
        let store = MetricStore::new();
        assert!(store.is_empty());
        for (_, series) in store.iter() {
            assert!(series.is_empty());
        }
    }

    #[test]
    fn test_append_only_touches_one_metric() {
        let mut store = MetricStore::new();
        let ts = Local.timestamp_opt(1_700_000_000, 0).unwrap();

        let stored = store.append(MetricKind::Hydration, ts, 50.0).clone();
        store.append(MetricKind::Hydration, ts, 52.0);

        assert_eq!(stored.value, 50.0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.series_for(MetricKind::Hydration).len(), 2);
        assert!(store.series_for(MetricKind::HeartRate).is_empty());
        assert_eq!(
            store.series_for(MetricKind::Hydration).latest().map(|r| r.value),
            Some(52.0)
        );
    }

    #[test]
    fn test_iter_is_in_display_order() {
        let store = MetricStore::new();
        let metrics: Vec<MetricKind> = store.iter().map(|(m, _)| m).collect();
        assert_eq!(metrics, MetricKind::ALL.to_vec());
    }
}
