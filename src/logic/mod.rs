//! Logic Module - Analysis Stages
//!
//! ## Stages (run in this order by `pipeline`)
//! - `features/` - Feature Builder (calendar + short rolling window)
//! - `model/` - Outlier Detector (isolation forest, contamination threshold)
//! - `severity/` - Severity Scorer (rolling z-score)
//! - `cause/` - Cause Classifier (rule cascade, priority, actions)
//! - `cost/` - Cost Estimator (long baseline, excess energy, cost)
//! - `report/` - Report Assembler (output table, views, KPIs)
//!
//! `dataset/` is the only place that touches files.

// Shared
pub mod config;
pub mod error;

// Stages
pub mod cause;
pub mod cost;
pub mod features;
pub mod model;
pub mod report;
pub mod severity;

// Orchestration and I/O
pub mod dataset;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult, PipelineWarning, WarningCounts};
pub use pipeline::{Pipeline, PipelineOutput};
