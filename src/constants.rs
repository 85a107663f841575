//! Central Configuration Constants
//!
//! Single source of truth for all pipeline defaults.
//! Every value here can be overridden per run through `PipelineConfig`.

/// Trailing window (samples) for the severity baseline
pub const DEFAULT_SHORT_WINDOW: usize = 24;

/// Minimum periods before the short window yields a value
pub const DEFAULT_SHORT_MIN_PERIODS: usize = 24;

/// Trailing window (samples) for the billing baseline (one week of hours)
pub const DEFAULT_LONG_WINDOW: usize = 24 * 7;

/// Minimum periods before the long window yields a value
pub const DEFAULT_LONG_MIN_PERIODS: usize = 24;

/// Number of isolation trees
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Expected fraction of anomalous hours
pub const DEFAULT_CONTAMINATION: f64 = 0.02;

/// Seed for the outlier model
pub const DEFAULT_SEED: u64 = 42;

/// Upper bound on rows sub-sampled per isolation tree
pub const DEFAULT_MAX_SAMPLES: usize = 256;

/// Electricity rate (currency units per kWh)
pub const DEFAULT_RATE: f64 = 0.15;

/// Rows in the top anomalies view
pub const DEFAULT_TOP_N: usize = 20;

/// z-score at or above which an anomaly counts as high severity
pub const DEFAULT_HIGH_SEVERITY_Z: f64 = 3.0;

/// Column holding the timestamp in input datasets
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Meter column selected when none is given
pub const DEFAULT_ENERGY_COLUMN: &str = "Panther_office_Hannah";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Energy Anomaly Detector";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Parse an environment variable or fall back to the default
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Ignoring unparsable {}={:?}, using default", key, raw);
                default
            }
        },
        Err(_) => default,
    }
}

/// Get the energy column name from environment or use default
pub fn get_energy_column() -> String {
    std::env::var("ENERGY_COLUMN").unwrap_or_else(|_| DEFAULT_ENERGY_COLUMN.to_string())
}

/// Get the electricity rate from environment or use default
pub fn get_rate() -> f64 {
    env_or("ENERGY_RATE", DEFAULT_RATE)
}
