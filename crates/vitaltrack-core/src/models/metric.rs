//! Tracked metric kinds

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A tracked health or suit metric
///
/// Variant order is the display order used by transcripts and charts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Beats per minute
    HeartRate,
    /// Blood oxygen saturation, percent
    OxygenLevel,
    /// Body mass index
    Bmi,
    /// Hydration, percent
    Hydration,
}

impl MetricKind {
    /// Every metric in display order
    pub const ALL: [MetricKind; 4] = [
        MetricKind::HeartRate,
        MetricKind::OxygenLevel,
        MetricKind::Bmi,
        MetricKind::Hydration,
    ];

    /// Canonical snake_case key
    pub fn key(self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::OxygenLevel => "oxygen_level",
            Self::Bmi => "bmi",
            Self::Hydration => "hydration",
        }
    }

    /// Name used inside alert sentences ("Your heart rate of ...")
    pub fn display_name(self) -> &'static str {
        match self {
            Self::HeartRate => "heart rate",
            Self::OxygenLevel => "oxygen level",
            Self::Bmi => "BMI",
            Self::Hydration => "hydration",
        }
    }

    /// Title label for transcripts and chart legends
    pub fn title(self) -> String {
        title_case(self.key())
    }

    /// Unit hint shown next to input fields
    pub fn unit(self) -> &'static str {
        match self {
            Self::HeartRate => "bpm",
            Self::OxygenLevel | Self::Hydration => "%",
            Self::Bmi => "kg/m²",
        }
    }

    /// Position in display order
    pub fn index(self) -> usize {
        match self {
            Self::HeartRate => 0,
            Self::OxygenLevel => 1,
            Self::Bmi => 2,
            Self::Hydration => 3,
        }
    }

    /// Next metric in display order, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous metric in display order, wrapping around
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MetricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|metric| metric.key() == name)
            .ok_or_else(|| Error::unknown_metric(s.trim()))
    }
}

/// Replace underscores with spaces and capitalize each word
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
