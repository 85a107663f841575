//! Cause Module - Cause Classifier
//!
//! Explains each anomalous hour with one cause from an ordered rule cascade
//! and assigns every hour a priority tier from its z-score.
//!
//! ## Structure
//! - `types`: CauseLabel, Priority, ClassifiedRow
//! - `rules`: thresholds and the ordered cascade
//! - `classifier`: classification logic
//! - `actions`: recommended action per cause
//!
//! ## Usage
//! ```ignore
//! let classified = classify_rows(scored_rows, &CauseThresholds::default());
//! for row in &classified {
//!     if let Some(cause) = row.cause {
//!         println!("{} ({})", cause, row.priority);
//!     }
//! }
//! ```

pub mod actions;
pub mod classifier;
pub mod rules;
pub mod types;

// Re-export main types for convenience
pub use actions::{ActionPlaybook, ResolvedAction, DEFAULT_FALLBACK_ACTION};
pub use classifier::{classify_cause, classify_row, classify_rows, priority};
pub use rules::{CauseRule, CauseThresholds, CAUSE_RULES, FALLBACK_CAUSE};
pub use types::{CauseLabel, ClassifiedRow, Priority};
