//! Chart geometry for metric plots
//!
//! Pure helpers that turn recorded series into axis bounds, labels and the
//! healthy-range band, kept apart from rendering so they can be tested.

use chrono::{Local, TimeZone};
use ratatui::style::Color;

use crate::models::{HealthyRange, MetricKind, Reading};

/// Axis label format for timestamps
const TIME_LABEL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Padding applied around a single-instant time axis, seconds
const MIN_TIME_SPAN: f64 = 60.0;

/// Plot color for a metric
pub fn metric_color(metric: MetricKind) -> Color {
    match metric {
        MetricKind::HeartRate => Color::Blue,
        MetricKind::OxygenLevel => Color::Green,
        MetricKind::Bmi => Color::Red,
        MetricKind::Hydration => Color::Magenta,
    }
}

/// `(unix seconds, value)` points for a series
pub fn points(readings: &[Reading]) -> Vec<(f64, f64)> {
    readings
        .iter()
        .map(|r| (r.timestamp.timestamp() as f64, r.value))
        .collect()
}

/// X bounds covering every point, widened when all points share an instant
pub fn time_bounds<'a>(series: impl IntoIterator<Item = &'a [(f64, f64)]>) -> [f64; 2] {
    let (lo, hi) = series
        .into_iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(x, _)| {
            (lo.min(x), hi.max(x))
        });

    if !lo.is_finite() {
        let now = Local::now().timestamp() as f64;
        return [now - MIN_TIME_SPAN, now + MIN_TIME_SPAN];
    }
    if hi - lo < MIN_TIME_SPAN {
        let mid = (lo + hi) / 2.0;
        return [mid - MIN_TIME_SPAN / 2.0, mid + MIN_TIME_SPAN / 2.0];
    }
    [lo, hi]
}

/// Y bounds covering every point and the healthy band, with a 10% margin
pub fn value_bounds<'a>(
    series: impl IntoIterator<Item = &'a [(f64, f64)]>,
    band: Option<HealthyRange>,
) -> [f64; 2] {
    let init = band.map_or((f64::INFINITY, f64::NEG_INFINITY), |r| (r.min, r.max));
    let (lo, hi) = series
        .into_iter()
        .flatten()
        .fold(init, |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));

    if !lo.is_finite() {
        return [0.0, 100.0];
    }
    let margin = ((hi - lo) * 0.1).max(1.0);
    [lo - margin, hi + margin]
}

/// Horizontal line across the x bounds at `y`
pub fn band_line(x_bounds: [f64; 2], y: f64) -> Vec<(f64, f64)> {
    vec![(x_bounds[0], y), (x_bounds[1], y)]
}

/// Start, middle and end labels for a time axis
pub fn time_labels(bounds: [f64; 2]) -> Vec<String> {
    [bounds[0], (bounds[0] + bounds[1]) / 2.0, bounds[1]]
        .into_iter()
        .map(|secs| {
            Local
                .timestamp_opt(secs.round() as i64, 0)
                .single()
                .map_or_else(String::new, |ts| ts.format(TIME_LABEL_FORMAT).to_string())
        })
        .collect()
}

/// Start, middle and end labels for a value axis
pub fn value_labels(bounds: [f64; 2]) -> Vec<String> {
    [bounds[0], (bounds[0] + bounds[1]) / 2.0, bounds[1]]
        .into_iter()
        .map(|v| format!("{v:.1}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_bounds_spread() {
        let a = [(1_000.0, 1.0), (1_500.0, 2.0)];
        let b = [(900.0, 3.0)];
        assert_eq!(time_bounds([&a[..], &b[..]]), [900.0, 1_500.0]);
    }

    #[test]
    fn test_time_bounds_single_instant_is_widened() {
        let a = [(1_000.0, 1.0), (1_000.0, 2.0)];
        assert_eq!(time_bounds([&a[..]]), [970.0, 1_030.0]);
    }

    #[test]
    fn test_time_bounds_empty_is_finite() {
        let bounds = time_bounds(std::iter::empty());
        assert!(bounds[0].is_finite() && bounds[0] < bounds[1]);
    }

    #[test]
    fn test_value_bounds_include_band() {
        let data = [(0.0, 70.0), (1.0, 80.0)];
        let band = HealthyRange { min: 60.0, max: 100.0 };
        assert_eq!(value_bounds([&data[..]], Some(band)), [56.0, 104.0]);
    }

    #[test]
    fn test_value_bounds_minimum_margin() {
        let data = [(0.0, 5.0), (1.0, 5.0)];
        assert_eq!(value_bounds([&data[..]], None), [4.0, 6.0]);
    }

    #[test]
    fn test_value_bounds_empty() {
        assert_eq!(value_bounds(std::iter::empty(), None), [0.0, 100.0]);
    }

    #[test]
    fn test_band_line_spans_axis() {
        assert_eq!(band_line([1.0, 9.0], 60.0), vec![(1.0, 60.0), (9.0, 60.0)]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(value_labels([0.0, 10.0]), vec!["0.0", "5.0", "10.0"]);
        assert_eq!(time_labels([0.0, 60.0]).len(), 3);
    }
}
