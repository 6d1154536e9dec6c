//! Readings and per-metric series

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A single recorded measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the reading was recorded, whole seconds
    pub timestamp: DateTime<Local>,
    /// Measured value
    pub value: f64,
}

impl Reading {
    /// Value formatted the way transcripts and alerts show it
    pub fn display_value(&self) -> String {
        format_value(self.value)
    }
}

/// Append-only history of readings for one metric
///
/// Insertion order is authoritative; two readings may share a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    readings: Vec<Reading>,
}

impl Series {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Most recent reading
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Readings in recording order
    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// Readings as a slice
    pub fn as_slice(&self) -> &[Reading] {
        &self.readings
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

/// Magnitudes at or above this print in exponent form
const EXPONENT_ABOVE: f64 = 1e16;
/// Non-zero magnitudes below this print in exponent form
const EXPONENT_BELOW: f64 = 1e-4;

/// Format a value like a float literal: `90.0`, `72.5`, `0.1`, `1e+16`
pub fn format_value(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        value.to_string()
    } else if magnitude != 0.0 && (magnitude >= EXPONENT_ABOVE || magnitude < EXPONENT_BELOW) {
        exponent_form(value)
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Signed, two-digit exponent: `-1e+308`, `1.5e-05`
fn exponent_form(value: f64) -> String {
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn reading(secs: i64, value: f64) -> Reading {
        Reading {
            timestamp: Local.timestamp_opt(secs, 0).unwrap(),
            value,
        }
    }

    #[rstest]
    #[case(90.0, "90.0")]
    #[case(72.5, "72.5")]
    #[case(18.25, "18.25")]
    #[case(-3.0, "-3.0")]
    #[case(0.1, "0.1")]
    #[case(0.0001, "0.0001")]
    #[case(1e15, "1000000000000000.0")]
    #[case(1e16, "1e+16")]
    #[case(-1e308, "-1e+308")]
    #[case(1.5e-5, "1.5e-05")]
    #[case(1.2345678901234568e17, "1.2345678901234568e+17")]
    #[case(0.0, "0.0")]
    fn test_format_value(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_value(value), expected);
    }

    #[test]
    fn test_empty_series_reports_no_data() {
        let series = Series::new();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }

    #[test]
    fn test_series_keeps_insertion_order() {
        let mut series = Series::new();
        series.push(reading(1_700_000_000, 70.0));
        series.push(reading(1_700_000_000, 72.0));
        series.push(reading(1_700_000_005, 65.0));

        let values: Vec<f64> = series.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![70.0, 72.0, 65.0]);
        assert_eq!(series.latest().unwrap().value, 65.0);
    }
}
