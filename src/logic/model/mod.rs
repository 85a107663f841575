//! Model Module - Outlier Detector
//!
//! Isolation forest over the feature matrix plus the contamination
//! threshold that turns its scores into anomaly flags.

pub mod detector;
pub mod iforest;
pub mod threshold;

#[cfg(test)]
mod tests;

// Re-export common types
pub use detector::{feature_matrix, Detection, OutlierDetector, MIN_FIT_ROWS};
pub use iforest::{ForestOptions, IsolationForest};
pub use threshold::{ContaminationThreshold, ThresholdStats};
