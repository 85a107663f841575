//! Feature Types
//!
//! Data structures only, no derivation logic.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;

// ============================================================================
// READING
// ============================================================================

/// One hourly meter reading as delivered by the dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// Power draw (kW); `None` when the meter reported nothing
    pub energy: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, energy: f64) -> Self {
        Self { timestamp, energy: Some(energy) }
    }

    pub fn missing(timestamp: NaiveDateTime) -> Self {
        Self { timestamp, energy: None }
    }

    /// Usable power value, if any
    pub fn valid_energy(&self) -> Option<f64> {
        self.energy.filter(|e| e.is_finite())
    }
}

// ============================================================================
// FEATURE ROW
// ============================================================================

/// Reading plus calendar and short-window rolling features
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Index of this reading in the cleaned, sorted series
    pub position: usize,
    pub timestamp: NaiveDateTime,
    pub energy: f64,
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub is_overnight: bool,
    pub rolling_mean: f64,
    pub rolling_std: f64,
}

impl FeatureRow {
    /// Values in `FEATURE_LAYOUT` order
    pub fn feature_values(&self) -> [f64; FEATURE_COUNT] {
        [
            self.energy,
            self.hour as f64,
            self.day_of_week as f64,
            if self.is_weekend { 1.0 } else { 0.0 },
            if self.is_overnight { 1.0 } else { 0.0 },
            self.rolling_mean,
            self.rolling_std,
        ]
    }
}

// ============================================================================
// CADENCE
// ============================================================================

/// Distribution of steps between consecutive readings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadenceReport {
    /// Steps of exactly one hour
    pub hourly_steps: usize,
    /// Steps of any other positive length
    pub irregular_gaps: usize,
    /// Steps of zero length
    pub duplicate_timestamps: usize,
}

impl CadenceReport {
    pub fn is_regular(&self) -> bool {
        self.irregular_gaps == 0 && self.duplicate_timestamps == 0
    }
}

// ============================================================================
// FEATURE SET
// ============================================================================

/// Output of the Feature Builder
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Rows with full short-window history, in timestamp order
    pub rows: Vec<FeatureRow>,
    /// Energy of every valid reading, sorted; `FeatureRow::position` indexes it
    pub series: Vec<f64>,
    pub cadence: CadenceReport,
    /// Readings dropped for missing power
    pub dropped_missing: usize,
    /// Valid readings dropped for insufficient rolling history
    pub dropped_warmup: usize,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
