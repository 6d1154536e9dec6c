//! Range check and condition classification

use tracing::debug;

use crate::models::{Alert, ConditionLabel, MetricKind, RangeTable};

/// Stateless evaluator that checks values against a range table
#[derive(Debug, Clone, Copy)]
pub struct AlertEngine<'a> {
    ranges: &'a RangeTable,
}

impl<'a> AlertEngine<'a> {
    /// Create an evaluator over the given ranges
    pub fn new(ranges: &'a RangeTable) -> Self {
        Self { ranges }
    }

    /// Check a value, returning an alert when it is outside the healthy range
    pub fn evaluate(&self, metric: MetricKind, value: f64) -> Option<Alert> {
        let range = self.ranges.bounds_for(metric);
        let deviation = range.deviation(value);

        debug!(
            metric = metric.key(),
            value,
            min = range.min,
            max = range.max,
            breached = deviation.is_some(),
            "Evaluated reading"
        );

        let deviation = deviation?;
        Some(Alert {
            metric,
            value,
            range,
            deviation,
            condition: ConditionLabel::classify(metric, deviation),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Deviation;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(MetricKind::HeartRate, 55.0, "Low heart rate (bradycardia)")]
    #[case(MetricKind::HeartRate, 120.0, "High heart rate (tachycardia)")]
    #[case(MetricKind::OxygenLevel, 90.0, "Low blood oxygen levels (hypoxemia)")]
    #[case(MetricKind::OxygenLevel, 100.5, "High blood oxygen levels (hyperoxia)")]
    #[case(MetricKind::Bmi, 17.0, "Underweight")]
    #[case(MetricKind::Bmi, 30.0, "Overweight or obesity")]
    #[case(MetricKind::Hydration, 40.0, "Dehydration")]
    #[case(MetricKind::Hydration, 80.0, "Overhydration")]
    fn test_condition_table(
        #[case] metric: MetricKind,
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        let ranges = RangeTable::default();
        let alert = AlertEngine::new(&ranges).evaluate(metric, value).unwrap();
        assert_eq!(alert.condition.as_str(), expected);
        assert_eq!(alert.metric, metric);
        assert_eq!(alert.value, value);
        assert_eq!(alert.range, ranges.bounds_for(metric));
    }

    #[rstest]
    #[case(60.0, None)]
    #[case(100.0, None)]
    #[case(80.0, None)]
    #[case(59.9, Some(ConditionLabel::Bradycardia))]
    #[case(100.1, Some(ConditionLabel::Tachycardia))]
    fn test_heart_rate_boundaries(#[case] value: f64, #[case] expected: Option<ConditionLabel>) {
        let ranges = RangeTable::default();
        let condition = AlertEngine::new(&ranges)
            .evaluate(MetricKind::HeartRate, value)
            .map(|a| a.condition);
        assert_eq!(condition, expected);
    }

    #[test]
    fn test_deviation_direction() {
        let ranges = RangeTable::default();
        let engine = AlertEngine::new(&ranges);
        assert_eq!(engine.evaluate(MetricKind::Bmi, 10.0).unwrap().deviation, Deviation::Below);
        assert_eq!(engine.evaluate(MetricKind::Bmi, 40.0).unwrap().deviation, Deviation::Above);
    }

    #[test]
    fn test_all_bounds_are_healthy() {
        let ranges = RangeTable::default();
        let engine = AlertEngine::new(&ranges);
        for (metric, range) in ranges.iter() {
            assert!(engine.evaluate(metric, range.min).is_none());
            assert!(engine.evaluate(metric, range.max).is_none());
        }
    }

    fn any_metric() -> impl Strategy<Value = MetricKind> {
        prop::sample::select(MetricKind::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_in_range_never_alerts(metric in any_metric(), t in 0.0f64..=1.0) {
            let ranges = RangeTable::default();
            let range = ranges.bounds_for(metric);
            let value = (range.min + (range.max - range.min) * t).clamp(range.min, range.max);
            prop_assert!(AlertEngine::new(&ranges).evaluate(metric, value).is_none());
        }

        #[test]
        fn prop_below_range_alerts_low(metric in any_metric(), delta in 0.001f64..1_000.0) {
            let ranges = RangeTable::default();
            let range = ranges.bounds_for(metric);
            let alert = AlertEngine::new(&ranges).evaluate(metric, range.min - delta);
            prop_assert_eq!(
                alert.map(|a| a.condition),
                Some(ConditionLabel::classify(metric, Deviation::Below))
            );
        }

        #[test]
        fn prop_above_range_alerts_high(metric in any_metric(), delta in 0.001f64..1_000.0) {
            let ranges = RangeTable::default();
            let range = ranges.bounds_for(metric);
            let alert = AlertEngine::new(&ranges).evaluate(metric, range.max + delta);
            prop_assert_eq!(alert.map(|a| a.deviation), Some(Deviation::Above));
        }
    }
}
