//! Severity Module - Severity Scorer
//!
//! z = (energy - rolling_mean) / rolling_std against the short window.
//!
//! ## Zero-variance policy
//! A window with zero (or non-finite) rolling std has no meaningful z-score.
//! Such rows get `z = 0.0` and `SeverityState::Indeterminate`; they never
//! pass a high-severity filter, whatever their anomaly flag says. NaN is
//! never produced.

use serde::{Deserialize, Serialize};

use crate::logic::error::{PipelineWarning, WarningCounts};
use crate::logic::features::FeatureRow;
use crate::logic::model::Detection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityState {
    Defined,
    /// Flat window, z forced to 0
    Indeterminate,
}

/// Standardized deviation of one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Severity {
    pub z_score: f64,
    pub state: SeverityState,
}

impl Severity {
    pub fn is_defined(&self) -> bool {
        self.state == SeverityState::Defined
    }

    /// z at or above the threshold, and only for defined scores
    pub fn is_high(&self, threshold: f64) -> bool {
        self.is_defined() && self.z_score >= threshold
    }
}

/// Pure per-row z-score
pub fn severity(energy: f64, rolling_mean: f64, rolling_std: f64) -> Severity {
    if rolling_std == 0.0 || !rolling_std.is_finite() {
        return Severity {
            z_score: 0.0,
            state: SeverityState::Indeterminate,
        };
    }

    let z = (energy - rolling_mean) / rolling_std;
    if z.is_finite() {
        Severity {
            z_score: z,
            state: SeverityState::Defined,
        }
    } else {
        Severity {
            z_score: 0.0,
            state: SeverityState::Indeterminate,
        }
    }
}

// ============================================================================
// SCORED ROW
// ============================================================================

/// FeatureRow plus anomaly flag and severity
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub features: FeatureRow,
    pub is_anomaly: bool,
    /// Raw isolation forest score
    pub anomaly_score: f64,
    pub severity: Severity,
}

impl ScoredRow {
    pub fn z_score(&self) -> f64 {
        self.severity.z_score
    }
}

/// Join detector output with per-row severity
///
/// `detection` must be aligned with `rows`.
pub fn score_rows(rows: Vec<FeatureRow>, detection: &Detection, warnings: &mut WarningCounts) -> Vec<ScoredRow> {
    rows.into_iter()
        .zip(detection.flags.iter().zip(detection.scores.iter()))
        .map(|(features, (&is_anomaly, &anomaly_score))| {
            let severity = severity(features.energy, features.rolling_mean, features.rolling_std);
            if !severity.is_defined() {
                warnings.record(PipelineWarning::UndefinedSeverity {
                    timestamp: features.timestamp,
                });
            }
            ScoredRow {
                features,
                is_anomaly,
                anomaly_score,
                severity,
            }
        })
        .collect()
}
