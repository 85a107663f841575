//! Outlier Detector
//!
//! Feature rows → isolation forest scores → contamination-calibrated flags.

use ndarray::Array2;

use super::iforest::{ForestOptions, IsolationForest};
use super::threshold::{ContaminationThreshold, ThresholdStats};
use crate::logic::config::DetectorConfig;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::features::{FeatureRow, FEATURE_COUNT};

/// Minimum rows the forest can be fitted on
pub const MIN_FIT_ROWS: usize = 2;

/// Per-row detector output, aligned with the input rows
#[derive(Debug, Clone)]
pub struct Detection {
    pub flags: Vec<bool>,
    pub scores: Vec<f64>,
    pub threshold: ThresholdStats,
}

impl Detection {
    pub fn anomaly_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }
}

pub struct OutlierDetector {
    config: DetectorConfig,
}

impl OutlierDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Fit on all rows and label each one
    pub fn detect(&self, rows: &[FeatureRow]) -> PipelineResult<Detection> {
        if rows.len() < MIN_FIT_ROWS {
            return Err(PipelineError::EmptyFeatureSet { rows: rows.len() });
        }

        let matrix = feature_matrix(rows);
        let options = ForestOptions {
            n_trees: self.config.n_estimators,
            sample_size: self.config.max_samples,
            seed: self.config.seed,
        };

        let forest = IsolationForest::fit(matrix.view(), &options);
        let scores = forest.score_samples(matrix.view());

        let threshold = ContaminationThreshold::fit(&scores, self.config.contamination);
        let flags: Vec<bool> = scores.iter().map(|s| threshold.is_anomaly(*s)).collect();
        let stats = threshold.stats(flags.iter().filter(|f| **f).count());

        log::debug!(
            "Outlier detector: {} trees, cutoff {:.4}, {} of {} rows flagged",
            forest.n_trees(),
            stats.cutoff,
            stats.flagged,
            rows.len()
        );

        Ok(Detection {
            flags,
            scores,
            threshold: stats,
        })
    }
}

/// Rows × FEATURE_LAYOUT matrix
pub fn feature_matrix(rows: &[FeatureRow]) -> Array2<f64> {
    let mut matrix = Array2::<f64>::zeros((rows.len(), FEATURE_COUNT));
    for (i, row) in rows.iter().enumerate() {
        for (j, value) in row.feature_values().iter().enumerate() {
            matrix[[i, j]] = *value;
        }
    }
    matrix
}
