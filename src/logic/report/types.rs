//! Report Types
//!
//! The persisted per-hour record and the aggregates built from it.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::logic::cause::{CauseLabel, Priority};

/// Timestamp text format of the output table
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serde adapter writing timestamps as `TIMESTAMP_FORMAT`
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// REPORT RECORD
// ============================================================================

/// One output row. Field order is the column order of the output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub energy: f64,
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub is_overnight: bool,
    pub rolling_mean: f64,
    pub rolling_std: f64,
    pub is_anomaly: bool,
    pub z_score: f64,
    pub baseline: Option<f64>,
    pub excess_energy: f64,
    pub excess_cost: f64,
    pub cause: Option<CauseLabel>,
    pub priority: Priority,
    pub recommended_action: Option<String>,
}

impl ReportRecord {
    /// False for flat windows, whose z-score is a placeholder 0
    pub fn severity_defined(&self) -> bool {
        self.rolling_std.is_finite() && self.rolling_std != 0.0
    }

    pub fn is_high_severity(&self, threshold: f64) -> bool {
        self.is_anomaly && self.severity_defined() && self.z_score >= threshold
    }
}

// ============================================================================
// AGGREGATES
// ============================================================================

/// Anomalies grouped under one cause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseImpact {
    pub cause: CauseLabel,
    pub count: usize,
    pub excess_energy: f64,
    pub excess_cost: f64,
}

/// Headline figures over the anomalous hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_anomalies: usize,
    pub total_excess_kwh: f64,
    pub total_cost: f64,
    pub avg_cost_per_anomaly: f64,
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
