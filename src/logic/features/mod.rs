//! Features Module - Feature Builder
//!
//! Derives calendar features and short-window rolling statistics from the
//! raw hourly series. Everything downstream consumes `FeatureRow`s.

pub mod builder;
pub mod layout;
pub mod rolling;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export common types
pub use builder::FeatureBuilder;
pub use layout::{feature_index, layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use types::{CadenceReport, FeatureRow, FeatureSet, Reading};
