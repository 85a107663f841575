//! Contamination Threshold
//!
//! Turns continuous anomaly scores into flags. The cutoff is the
//! `(1 - contamination)` quantile of the training scores, so roughly a
//! `contamination` fraction of rows lands strictly above it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct ContaminationThreshold {
    contamination: f64,
    cutoff: f64,
    scores_seen: usize,
    mean_score: f64,
}

impl ContaminationThreshold {
    /// Calibrate the cutoff from training scores
    pub fn fit(scores: &[f64], contamination: f64) -> Self {
        let mut sorted: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean_score = if sorted.is_empty() {
            0.0
        } else {
            sorted.iter().sum::<f64>() / sorted.len() as f64
        };

        Self {
            contamination,
            cutoff: quantile(&sorted, 1.0 - contamination),
            scores_seen: sorted.len(),
            mean_score,
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Strictly above the cutoff
    pub fn is_anomaly(&self, score: f64) -> bool {
        score > self.cutoff
    }

    pub fn stats(&self, flagged: usize) -> ThresholdStats {
        ThresholdStats {
            cutoff: self.cutoff,
            contamination: self.contamination,
            mean_score: self.mean_score,
            sample_count: self.scores_seen,
            flagged,
        }
    }
}

/// Linear-interpolated quantile of sorted values
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::INFINITY,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// Threshold statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStats {
    pub cutoff: f64,
    pub contamination: f64,
    pub mean_score: f64,
    pub sample_count: usize,
    pub flagged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.5), 2.0);
        assert!((quantile(&sorted, 0.9) - 3.6).abs() < 1e-12);
        assert_eq!(quantile(&[], 0.5), f64::INFINITY);
    }

    #[test]
    fn test_flags_approximate_contamination() {
        let scores: Vec<f64> = (0..1000).map(|i| i as f64 / 1000.0).collect();
        let threshold = ContaminationThreshold::fit(&scores, 0.02);
        let flagged = scores.iter().filter(|s| threshold.is_anomaly(**s)).count();
        assert_eq!(flagged, 20);
    }

    #[test]
    fn test_ties_never_flag_everything() {
        let scores = vec![0.5; 50];
        let threshold = ContaminationThreshold::fit(&scores, 0.1);
        assert!(scores.iter().all(|s| !threshold.is_anomaly(*s)));
    }

    #[test]
    fn test_stats() {
        let threshold = ContaminationThreshold::fit(&[0.2, 0.4], 0.5);
        let stats = threshold.stats(1);
        assert_eq!(stats.sample_count, 2);
        assert!((stats.mean_score - 0.3).abs() < 1e-12);
        assert_eq!(stats.flagged, 1);
    }
}
