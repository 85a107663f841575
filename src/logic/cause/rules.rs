//! Cause Classification Rules & Thresholds
//!
//! The ordered rule cascade and its thresholds.
//! No classify logic here - only rules and config.

use serde::{Deserialize, Serialize};

use super::types::CauseLabel;
use crate::logic::error::{PipelineError, PipelineResult};
use crate::logic::severity::ScoredRow;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// z at or above which an overnight/weekend anomaly counts as a spike
pub const SPIKE_Z: f64 = 1.5;

/// z at or above which any anomaly counts as a sudden spike
pub const BIG_SPIKE_Z: f64 = 2.5;

/// z at or below which an anomaly counts as a load drop
pub const DROP_Z: f64 = -1.5;

/// z at or above which priority is High
pub const HIGH_PRIORITY_Z: f64 = 3.5;

/// z at or above which priority is Medium
pub const MEDIUM_PRIORITY_Z: f64 = 2.5;

/// Thresholds for classification (configurable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseThresholds {
    pub spike_z: f64,
    pub big_spike_z: f64,
    pub drop_z: f64,
    pub high_priority_z: f64,
    pub medium_priority_z: f64,
}

impl Default for CauseThresholds {
    fn default() -> Self {
        Self {
            spike_z: SPIKE_Z,
            big_spike_z: BIG_SPIKE_Z,
            drop_z: DROP_Z,
            high_priority_z: HIGH_PRIORITY_Z,
            medium_priority_z: MEDIUM_PRIORITY_Z,
        }
    }
}

impl CauseThresholds {
    pub fn validate(&self) -> PipelineResult<()> {
        let all = [self.spike_z, self.big_spike_z, self.drop_z, self.high_priority_z, self.medium_priority_z];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::InvalidConfig("cause thresholds must be finite".to_string()));
        }
        if self.medium_priority_z > self.high_priority_z {
            return Err(PipelineError::InvalidConfig(
                "medium_priority_z must not exceed high_priority_z".to_string(),
            ));
        }
        if self.drop_z >= 0.0 || self.spike_z <= 0.0 {
            return Err(PipelineError::InvalidConfig(
                "drop_z must be negative and spike_z positive".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// RULE CASCADE
// ============================================================================

/// One step of the cascade
pub struct CauseRule {
    pub name: &'static str,
    pub cause: CauseLabel,
    pub applies: fn(&ScoredRow, &CauseThresholds) -> bool,
}

fn overnight_spike(row: &ScoredRow, t: &CauseThresholds) -> bool {
    row.features.is_overnight && row.z_score() >= t.spike_z
}

fn weekend_spike(row: &ScoredRow, t: &CauseThresholds) -> bool {
    row.features.is_weekend && row.z_score() >= t.spike_z
}

fn big_spike(row: &ScoredRow, t: &CauseThresholds) -> bool {
    row.z_score() >= t.big_spike_z
}

fn load_drop(row: &ScoredRow, t: &CauseThresholds) -> bool {
    row.z_score() <= t.drop_z
}

/// Evaluated top-down, first match wins.
/// Rows matching none get `FALLBACK_CAUSE`.
pub const CAUSE_RULES: &[CauseRule] = &[
    CauseRule {
        name: "overnight_spike",
        cause: CauseLabel::AfterHoursHvac,
        applies: overnight_spike,
    },
    CauseRule {
        name: "weekend_spike",
        cause: CauseLabel::WeekendOverride,
        applies: weekend_spike,
    },
    CauseRule {
        name: "big_spike",
        cause: CauseLabel::SuddenSpike,
        applies: big_spike,
    },
    CauseRule {
        name: "drop",
        cause: CauseLabel::LoadDrop,
        applies: load_drop,
    },
];

pub const FALLBACK_CAUSE: CauseLabel = CauseLabel::Atypical;
