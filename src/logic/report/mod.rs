//! Report Module - Report Assembler
//!
//! Joins every derived column into one record per hour, attaches the
//! recommended action per cause, and builds the summary views.
//!
//! ## Structure
//! - `types`: ReportRecord (output columns), CauseImpact, Kpis
//! - `assembler`: ExplainedRow → ReportRecord
//! - `views`: Report with sorted/aggregated projections and repricing
//! - `summary`: RunSummary JSON document

pub mod assembler;
pub mod summary;
pub mod types;
pub mod views;


// Re-export main types for convenience
pub use assembler::ReportAssembler;
pub use summary::RunSummary;
pub use types::{round2, CauseImpact, Kpis, ReportRecord, TIMESTAMP_FORMAT};
pub use views::{Report, ReportFilter};
