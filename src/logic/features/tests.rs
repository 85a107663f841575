//! Integration Tests for the Feature Builder

#[cfg(test)]
mod integration_tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use crate::logic::config::FeatureConfig;
    use crate::logic::error::PipelineError;
    use crate::logic::features::{FeatureBuilder, Reading};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 1, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn hourly(values: &[f64]) -> Vec<Reading> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Reading::new(start() + Duration::hours(i as i64), v))
            .collect()
    }

    /// Output drops exactly the warm-up rows
    #[test]
    fn test_output_length() {
        let values: Vec<f64> = (0..100).map(|i| 10.0 + (i % 7) as f64).collect();
        let set = FeatureBuilder::new(FeatureConfig::default()).build(&hourly(&values)).unwrap();

        assert_eq!(set.rows.len(), 100 - 23);
        assert_eq!(set.dropped_warmup, 23);
        assert_eq!(set.dropped_missing, 0);
        assert_eq!(set.rows[0].position, 23);
        assert_eq!(set.rows[0].timestamp, start() + Duration::hours(23));
    }

    /// Exactly one full window yields exactly one row
    #[test]
    fn test_minimum_history() {
        let values: Vec<f64> = (0..24).map(|i| i as f64).collect();
        let set = FeatureBuilder::new(FeatureConfig::default()).build(&hourly(&values)).unwrap();
        assert_eq!(set.rows.len(), 1);
        assert!((set.rows[0].rolling_mean - 11.5).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_history() {
        let values = vec![1.0; 23];
        let result = FeatureBuilder::new(FeatureConfig::default()).build(&hourly(&values));
        match result {
            Err(PipelineError::InsufficientHistory { required, actual }) => {
                assert_eq!(required, 24);
                assert_eq!(actual, 23);
            }
            other => panic!("Expected InsufficientHistory, got {:?}", other.map(|s| s.len())),
        }
    }

    /// Missing values are removed before counting history
    #[test]
    fn test_missing_values_dropped_first() {
        let mut readings = hourly(&vec![5.0; 30]);
        readings[3] = Reading::missing(readings[3].timestamp);
        readings[4].energy = Some(f64::NAN);

        let set = FeatureBuilder::new(FeatureConfig::default()).build(&readings).unwrap();
        assert_eq!(set.dropped_missing, 2);
        assert_eq!(set.series.len(), 28);
        assert_eq!(set.rows.len(), 28 - 23);
        assert_eq!(set.cadence.irregular_gaps, 1);
    }

    #[test]
    fn test_missing_values_can_cause_insufficient_history() {
        let mut readings = hourly(&vec![5.0; 25]);
        readings[0].energy = None;
        readings[1].energy = None;
        let result = FeatureBuilder::new(FeatureConfig::default()).build(&readings);
        assert!(matches!(result, Err(PipelineError::InsufficientHistory { actual: 23, .. })));
    }

    /// Unsorted input is sorted before rolling
    #[test]
    fn test_input_sorted() {
        let values: Vec<f64> = (0..48).map(|i| i as f64).collect();
        let mut readings = hourly(&values);
        readings.reverse();

        let set = FeatureBuilder::new(FeatureConfig::default()).build(&readings).unwrap();
        assert!(set.rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(set.cadence.is_regular());
        // Trailing mean of 24..=47
        let last = set.rows.last().unwrap();
        assert!((last.rolling_mean - 35.5).abs() < 1e-12);
    }

    #[test]
    fn test_feature_values_follow_layout() {
        let set = FeatureBuilder::new(FeatureConfig::default())
            .build(&hourly(&vec![2.0; 30]))
            .unwrap();
        let row = &set.rows[0];
        let values = row.feature_values();
        assert_eq!(values[0], row.energy);
        assert_eq!(values[1], row.hour as f64);
        assert_eq!(values[6], 0.0);
    }
}
