//! Integration Tests for the Outlier Detector

#[cfg(test)]
mod integration_tests {
    use chrono::{Duration, NaiveDate};

    use crate::logic::config::{DetectorConfig, FeatureConfig};
    use crate::logic::error::PipelineError;
    use crate::logic::features::{feature_index, FeatureBuilder, FeatureRow, Reading};
    use crate::logic::model::{feature_matrix, OutlierDetector};

    /// Office-like daily profile with one injected overnight spike
    fn office_rows(hours: usize, spike_at: usize) -> Vec<FeatureRow> {
        let start = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let readings: Vec<Reading> = (0..hours)
            .map(|i| {
                let hour = i % 24;
                let base = if (8..18).contains(&hour) { 40.0 } else { 15.0 };
                let wiggle = ((i * 7) % 5) as f64 * 0.4;
                let energy = if i == spike_at { 120.0 } else { base + wiggle };
                Reading::new(start + Duration::hours(i as i64), energy)
            })
            .collect();
        FeatureBuilder::new(FeatureConfig::default()).build(&readings).unwrap().rows
    }

    #[test]
    fn test_detect_is_deterministic() {
        let rows = office_rows(24 * 21, 300);
        let detector = OutlierDetector::new(DetectorConfig::default());

        let first = detector.detect(&rows).unwrap();
        let second = detector.detect(&rows).unwrap();
        assert_eq!(first.flags, second.flags);
        assert_eq!(first.scores, second.scores);
    }

    #[test]
    fn test_flag_fraction_near_contamination() {
        let rows = office_rows(24 * 21, 300);
        let detection = OutlierDetector::new(DetectorConfig::default()).detect(&rows).unwrap();

        assert_eq!(detection.flags.len(), rows.len());
        let fraction = detection.anomaly_count() as f64 / rows.len() as f64;
        assert!(fraction > 0.0);
        assert!(fraction <= 0.05, "fraction {} too far from 0.02", fraction);
    }

    #[test]
    fn test_injected_spike_is_flagged() {
        let rows = office_rows(24 * 21, 300);
        let detection = OutlierDetector::new(DetectorConfig::default()).detect(&rows).unwrap();

        let idx = rows.iter().position(|r| r.position == 300).unwrap();
        assert!(detection.flags[idx]);
    }

    #[test]
    fn test_empty_feature_set() {
        let rows = office_rows(24, 100);
        assert_eq!(rows.len(), 1);
        let result = OutlierDetector::new(DetectorConfig::default()).detect(&rows);
        assert!(matches!(result, Err(PipelineError::EmptyFeatureSet { rows: 1 })));

        let result = OutlierDetector::new(DetectorConfig::default()).detect(&[]);
        assert!(matches!(result, Err(PipelineError::EmptyFeatureSet { rows: 0 })));
    }

    #[test]
    fn test_feature_matrix_shape() {
        let rows = office_rows(30, 100);
        let matrix = feature_matrix(&rows);
        assert_eq!(matrix.shape(), &[7, 7]);
        assert_eq!(matrix[[0, feature_index("energy").unwrap()]], rows[0].energy);
        assert_eq!(matrix[[3, feature_index("hour").unwrap()]], rows[3].hour as f64);
    }
}
