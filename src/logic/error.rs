//! Error handling
//!
//! Fatal errors abort the run before anything is persisted.
//! Warnings are recovered locally and tallied on the run output.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::cause::CauseLabel;

pub type PipelineResult<T> = Result<T, PipelineError>;

// ============================================================================
// FATAL ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Fewer valid readings than the rolling window needs
    #[error("insufficient history: need at least {required} valid readings, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Outlier model cannot fit
    #[error("empty feature set: outlier model needs at least 2 rows, got {rows}")]
    EmptyFeatureSet { rows: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("column not found in dataset: {0}")]
    MissingColumn(String),

    #[error("invalid timestamp {value:?} on line {line}")]
    InvalidTimestamp { line: u64, value: String },

    #[error("invalid action playbook: {0}")]
    InvalidPlaybook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// NON-FATAL WARNINGS
// ============================================================================

/// Conditions the pipeline recovers from
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    /// Zero-variance window, z defined as 0
    UndefinedSeverity { timestamp: NaiveDateTime },
    /// Cause without an action mapping, fallback text used
    UnmappedCause { cause: CauseLabel },
    /// Consecutive readings not one hour apart
    IrregularCadence { gaps: usize },
    /// Same timestamp seen more than once
    DuplicateTimestamp { count: usize },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::UndefinedSeverity { timestamp } => {
                write!(f, "zero rolling std at {}, z-score defined as 0", timestamp)
            }
            PipelineWarning::UnmappedCause { cause } => {
                write!(f, "no action mapped for cause {:?}, using fallback", cause.label())
            }
            PipelineWarning::IrregularCadence { gaps } => {
                write!(f, "{} gaps between readings are not one hour", gaps)
            }
            PipelineWarning::DuplicateTimestamp { count } => {
                write!(f, "{} duplicate timestamps in input", count)
            }
        }
    }
}

/// Tally of warnings raised during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningCounts {
    pub undefined_severity: usize,
    pub unmapped_cause: usize,
    pub irregular_cadence: usize,
    pub duplicate_timestamp: usize,
}

impl WarningCounts {
    /// Log and count a warning
    pub fn record(&mut self, warning: PipelineWarning) {
        log::warn!("{}", warning);
        match warning {
            PipelineWarning::UndefinedSeverity { .. } => self.undefined_severity += 1,
            PipelineWarning::UnmappedCause { .. } => self.unmapped_cause += 1,
            PipelineWarning::IrregularCadence { gaps } => self.irregular_cadence += gaps,
            PipelineWarning::DuplicateTimestamp { count } => self.duplicate_timestamp += count,
        }
    }

    pub fn total(&self) -> usize {
        self.undefined_severity + self.unmapped_cause + self.irregular_cadence + self.duplicate_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_history_message() {
        let err = PipelineError::InsufficientHistory { required: 24, actual: 3 };
        assert!(err.to_string().contains("24"));
        assert!(err.to_string().contains("3"));
    }

    #[test]
    fn test_warning_counts() {
        let mut counts = WarningCounts::default();
        counts.record(PipelineWarning::IrregularCadence { gaps: 2 });
        counts.record(PipelineWarning::UnmappedCause { cause: CauseLabel::LoadDrop });
        assert_eq!(counts.irregular_cadence, 2);
        assert_eq!(counts.unmapped_cause, 1);
        assert_eq!(counts.total(), 3);
    }
}
