//! Model Input Layout
//!
//! Column order of the outlier model's feature matrix. The version and
//! CRC32 fingerprint land in every run summary so two runs can be checked
//! for comparable inputs.
//!
//! Bump `FEATURE_VERSION` whenever a column is added, removed or moved.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

pub const FEATURE_VERSION: u8 = 1;

pub const FEATURE_COUNT: usize = 7;

/// Matrix columns, left to right
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "energy",       // kW
    "hour",         // 0-23
    "day_of_week",  // Monday = 0
    "is_weekend",   // 0/1
    "is_overnight", // 0/1, hours 0-6
    "rolling_mean", // short window
    "rolling_std",  // short window, n-1
];

/// Fingerprint of version + column names
pub fn layout_hash() -> u32 {
    let mut crc = Hasher::new();
    crc.update(&[FEATURE_VERSION]);
    FEATURE_LAYOUT.iter().for_each(|column| {
        crc.update(column.as_bytes());
        crc.update(b"\0");
    });
    crc.finalize()
}

/// Column of a named feature in the matrix
pub fn feature_index(column: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|c| *c == column)
}

/// Layout snapshot stored with each run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub columns: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            columns: FEATURE_LAYOUT.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Same version and fingerprint as this build
    pub fn is_current(&self) -> bool {
        self.version == FEATURE_VERSION && self.hash == layout_hash()
    }
}
