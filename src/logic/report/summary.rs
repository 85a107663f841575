//! Run Summary
//!
//! Machine-readable record of one pipeline run, exported as JSON next to
//! the output table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{CauseImpact, Kpis, ReportRecord};
use crate::logic::config::PipelineConfig;
use crate::logic::error::WarningCounts;
use crate::logic::features::{CadenceReport, LayoutInfo};
use crate::logic::model::ThresholdStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub app_version: String,
    pub config: PipelineConfig,
    pub layout: LayoutInfo,

    // Row accounting
    pub input_readings: usize,
    pub dropped_missing: usize,
    pub dropped_warmup: usize,
    pub rows: usize,

    pub cadence: CadenceReport,
    pub threshold: ThresholdStats,
    pub warnings: WarningCounts,

    pub rate: f64,
    pub kpis: Kpis,
    pub impact_by_cause: Vec<CauseImpact>,
    pub top_anomalies: Vec<ReportRecord>,
}
