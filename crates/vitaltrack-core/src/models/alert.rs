//! Alert data models

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::metric::MetricKind;
use super::range::HealthyRange;
use super::reading::{format_value, Reading};

/// Side of the healthy range a value fell on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    /// Below the minimum
    Below,
    /// Above the maximum
    Above,
}

/// Possible condition behind an out-of-range reading
///
/// Serialized as its human-readable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionLabel {
    /// Low heart rate
    Bradycardia,
    /// High heart rate
    Tachycardia,
    /// Low blood oxygen
    Hypoxemia,
    /// High blood oxygen
    Hyperoxia,
    /// Low BMI
    Underweight,
    /// High BMI
    Overweight,
    /// Low hydration
    Dehydration,
    /// High hydration
    Overhydration,
}

impl ConditionLabel {
    /// Every label
    pub const ALL: [ConditionLabel; 8] = [
        ConditionLabel::Bradycardia,
        ConditionLabel::Tachycardia,
        ConditionLabel::Hypoxemia,
        ConditionLabel::Hyperoxia,
        ConditionLabel::Underweight,
        ConditionLabel::Overweight,
        ConditionLabel::Dehydration,
        ConditionLabel::Overhydration,
    ];

    /// Label for a metric deviating in the given direction
    pub fn classify(metric: MetricKind, deviation: Deviation) -> Self {
        match (metric, deviation) {
            (MetricKind::HeartRate, Deviation::Below) => Self::Bradycardia,
            (MetricKind::HeartRate, Deviation::Above) => Self::Tachycardia,
            (MetricKind::OxygenLevel, Deviation::Below) => Self::Hypoxemia,
            (MetricKind::OxygenLevel, Deviation::Above) => Self::Hyperoxia,
            (MetricKind::Bmi, Deviation::Below) => Self::Underweight,
            (MetricKind::Bmi, Deviation::Above) => Self::Overweight,
            (MetricKind::Hydration, Deviation::Below) => Self::Dehydration,
            (MetricKind::Hydration, Deviation::Above) => Self::Overhydration,
        }
    }

    /// Human-readable condition text
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bradycardia => "Low heart rate (bradycardia)",
            Self::Tachycardia => "High heart rate (tachycardia)",
            Self::Hypoxemia => "Low blood oxygen levels (hypoxemia)",
            Self::Hyperoxia => "High blood oxygen levels (hyperoxia)",
            Self::Underweight => "Underweight",
            Self::Overweight => "Overweight or obesity",
            Self::Dehydration => "Dehydration",
            Self::Overhydration => "Overhydration",
        }
    }
}

impl fmt::Display for ConditionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConditionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConditionLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == text)
            .ok_or_else(|| de::Error::custom(format!("unknown condition '{text}'")))
    }
}

/// A reading that fell outside its healthy range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Metric that triggered the alert
    pub metric: MetricKind,
    /// Offending value
    pub value: f64,
    /// Range the value was checked against
    pub range: HealthyRange,
    /// Direction of the deviation
    pub deviation: Deviation,
    /// Possible condition
    pub condition: ConditionLabel,
}

impl Alert {
    /// First line: what was out of range
    pub fn warning(&self) -> String {
        format!(
            "Your {} of {} is outside the healthy range ({} to {}).",
            self.metric,
            format_value(self.value),
            self.range.min,
            self.range.max
        )
    }

    /// Full alert text shown to the user
    pub fn message(&self) -> String {
        format!(
            "{}\nPossible condition: {}.\nPlease consult a healthcare professional.",
            self.warning(),
            self.condition
        )
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Result of recording one value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    /// Metric the reading was stored under
    pub metric: MetricKind,
    /// The stored reading
    pub reading: Reading,
    /// Alert raised by the reading, if any
    pub alert: Option<Alert>,
}

impl RecordOutcome {
    /// Whether the reading was within its healthy range
    pub fn is_healthy(&self) -> bool {
        self.alert.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classification_is_exhaustive() {
        let mut seen = std::collections::HashSet::new();
        for metric in MetricKind::ALL {
            for deviation in [Deviation::Below, Deviation::Above] {
                assert!(seen.insert(ConditionLabel::classify(metric, deviation)));
            }
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_alert_message_template() {
        let alert = Alert {
            metric: MetricKind::HeartRate,
            value: 55.0,
            range: HealthyRange { min: 60.0, max: 100.0 },
            deviation: Deviation::Below,
            condition: ConditionLabel::Bradycardia,
        };

        assert_eq!(
            alert.message(),
            "Your heart rate of 55.0 is outside the healthy range (60 to 100).\n\
             Possible condition: Low heart rate (bradycardia).\n\
             Please consult a healthcare professional."
        );
    }

    #[test]
    fn test_alert_message_fractional_bounds() {
        let alert = Alert {
            metric: MetricKind::Bmi,
            value: 30.0,
            range: HealthyRange { min: 18.5, max: 24.9 },
            deviation: Deviation::Above,
            condition: ConditionLabel::Overweight,
        };

        assert_eq!(
            alert.warning(),
            "Your BMI of 30.0 is outside the healthy range (18.5 to 24.9)."
        );
    }

    #[test]
    fn test_alert_json_carries_condition_text() {
        let alert = Alert {
            metric: MetricKind::Bmi,
            value: 30.0,
            range: HealthyRange { min: 18.5, max: 24.9 },
            deviation: Deviation::Above,
            condition: ConditionLabel::Overweight,
        };

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["condition"], "Overweight or obesity");
        assert_eq!(json["metric"], "bmi");

        let back: Alert = serde_json::from_value(json).unwrap();
        assert_eq!(back, alert);
    }

    #[test]
    fn test_condition_text_round_trips_for_every_label() {
        for label in ConditionLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
            assert_eq!(serde_json::from_str::<ConditionLabel>(&json).unwrap(), label);
        }
        assert!(serde_json::from_str::<ConditionLabel>("\"overweight\"").is_err());
    }
}
