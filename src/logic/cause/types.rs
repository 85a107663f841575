//! Cause Types
//!
//! Core types for cause classification.
//! No logic here - only data structures.

use serde::{Deserialize, Serialize};

use crate::logic::severity::ScoredRow;

// ============================================================================
// CAUSE LABEL
// ============================================================================

/// Explanation attached to an anomalous hour
///
/// Serialized as the operator-facing label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CauseLabel {
    #[serde(rename = "After hours HVAC running")]
    AfterHoursHvac,
    #[serde(rename = "Weekend schedule override or event")]
    WeekendOverride,
    #[serde(rename = "Sudden load spike (possible equipment fault or override)")]
    SuddenSpike,
    #[serde(rename = "Unexpected load drop (shutdown or schedule change)")]
    LoadDrop,
    #[serde(rename = "Atypical energy behavior (requires review)")]
    Atypical,
}

impl CauseLabel {
    pub const ALL: [CauseLabel; 5] = [
        CauseLabel::AfterHoursHvac,
        CauseLabel::WeekendOverride,
        CauseLabel::SuddenSpike,
        CauseLabel::LoadDrop,
        CauseLabel::Atypical,
    ];

    /// Operator-facing text
    pub fn label(&self) -> &'static str {
        match self {
            CauseLabel::AfterHoursHvac => "After hours HVAC running",
            CauseLabel::WeekendOverride => "Weekend schedule override or event",
            CauseLabel::SuddenSpike => "Sudden load spike (possible equipment fault or override)",
            CauseLabel::LoadDrop => "Unexpected load drop (shutdown or schedule change)",
            CauseLabel::Atypical => "Atypical energy behavior (requires review)",
        }
    }

    /// Short machine name of the rule that produces this cause
    pub fn code(&self) -> &'static str {
        match self {
            CauseLabel::AfterHoursHvac => "overnight_spike",
            CauseLabel::WeekendOverride => "weekend_spike",
            CauseLabel::SuddenSpike => "big_spike",
            CauseLabel::LoadDrop => "drop",
            CauseLabel::Atypical => "default",
        }
    }
}

impl std::fmt::Display for CauseLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for CauseLabel {
    type Err = String;

    /// Accepts either the label text or the rule code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CauseLabel::ALL
            .iter()
            .copied()
            .find(|c| c.label() == s || c.code() == s)
            .ok_or_else(|| format!("unknown cause {:?}", s))
    }
}

// ============================================================================
// PRIORITY
// ============================================================================

/// Follow-up priority tier, derived from z alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// 0 = Low, 2 = High
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CLASSIFIED ROW
// ============================================================================

/// ScoredRow plus cause and priority
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub scored: ScoredRow,
    /// Only anomalous rows carry a cause
    pub cause: Option<CauseLabel>,
    pub priority: Priority,
}
