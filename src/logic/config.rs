//! Pipeline Configuration
//!
//! Window sizes, model parameters and the electricity rate are passed into
//! each stage explicitly. Nothing here is global state.

use serde::{Deserialize, Serialize};

use crate::constants::{self, env_or};
use crate::logic::cause::CauseThresholds;
use crate::logic::error::{PipelineError, PipelineResult};

// ============================================================================
// STAGE CONFIGS
// ============================================================================

/// Feature Builder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Trailing window for rolling mean/std
    pub short_window: usize,
    /// Samples required before the window yields a value
    pub short_min_periods: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            short_window: constants::DEFAULT_SHORT_WINDOW,
            short_min_periods: constants::DEFAULT_SHORT_MIN_PERIODS,
        }
    }
}

/// Outlier Detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub n_estimators: usize,
    /// Expected fraction of anomalous rows, in (0, 0.5]
    pub contamination: f64,
    pub seed: u64,
    /// Rows sub-sampled per tree (capped at the row count)
    pub max_samples: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            n_estimators: constants::DEFAULT_N_ESTIMATORS,
            contamination: constants::DEFAULT_CONTAMINATION,
            seed: constants::DEFAULT_SEED,
            max_samples: constants::DEFAULT_MAX_SAMPLES,
        }
    }
}

/// Cost Estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Trailing window for the billing baseline
    pub long_window: usize,
    pub long_min_periods: usize,
    /// Currency units per kWh
    pub rate: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            long_window: constants::DEFAULT_LONG_WINDOW,
            long_min_periods: constants::DEFAULT_LONG_MIN_PERIODS,
            rate: constants::DEFAULT_RATE,
        }
    }
}

impl CostConfig {
    /// Same windows, different rate
    pub fn with_rate(&self, rate: f64) -> Self {
        Self { rate, ..self.clone() }
    }
}

/// Report Assembler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_n: usize,
    pub high_severity_z: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: constants::DEFAULT_TOP_N,
            high_severity_z: constants::DEFAULT_HIGH_SEVERITY_Z,
        }
    }
}

// ============================================================================
// PIPELINE CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub features: FeatureConfig,
    pub detector: DetectorConfig,
    pub cause: CauseThresholds,
    pub cost: CostConfig,
    pub report: ReportConfig,
}

impl PipelineConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            features: FeatureConfig {
                short_window: env_or("ENERGY_SHORT_WINDOW", defaults.features.short_window),
                short_min_periods: env_or("ENERGY_SHORT_MIN_PERIODS", defaults.features.short_min_periods),
            },
            detector: DetectorConfig {
                n_estimators: env_or("ENERGY_N_ESTIMATORS", defaults.detector.n_estimators),
                contamination: env_or("ENERGY_CONTAMINATION", defaults.detector.contamination),
                seed: env_or("ENERGY_SEED", defaults.detector.seed),
                max_samples: env_or("ENERGY_MAX_SAMPLES", defaults.detector.max_samples),
            },
            cause: defaults.cause,
            cost: CostConfig {
                long_window: env_or("ENERGY_LONG_WINDOW", defaults.cost.long_window),
                long_min_periods: env_or("ENERGY_LONG_MIN_PERIODS", defaults.cost.long_min_periods),
                rate: constants::get_rate(),
            },
            report: ReportConfig {
                top_n: env_or("ENERGY_TOP_N", defaults.report.top_n),
                high_severity_z: env_or("ENERGY_HIGH_SEVERITY_Z", defaults.report.high_severity_z),
            },
        }
    }

    /// Reject configurations no stage can run with
    pub fn validate(&self) -> PipelineResult<()> {
        let f = &self.features;
        if f.short_window == 0 {
            return Err(invalid("short_window must be positive"));
        }
        if f.short_min_periods < 2 || f.short_min_periods > f.short_window {
            return Err(invalid("short_min_periods must be in [2, short_window]"));
        }

        let d = &self.detector;
        if d.n_estimators == 0 {
            return Err(invalid("n_estimators must be positive"));
        }
        if !(d.contamination > 0.0 && d.contamination <= 0.5) {
            return Err(invalid("contamination must be in (0, 0.5]"));
        }
        if d.max_samples < 2 {
            return Err(invalid("max_samples must be at least 2"));
        }

        let c = &self.cost;
        if c.long_window == 0 {
            return Err(invalid("long_window must be positive"));
        }
        if c.long_min_periods == 0 || c.long_min_periods > c.long_window {
            return Err(invalid("long_min_periods must be in [1, long_window]"));
        }
        validate_rate(c.rate)?;

        self.cause.validate()?;
        Ok(())
    }
}

/// Rates must be finite and non-negative
pub fn validate_rate(rate: f64) -> PipelineResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(invalid(&format!("rate must be a non-negative number, got {}", rate)));
    }
    Ok(())
}

fn invalid(msg: &str) -> PipelineError {
    PipelineError::InvalidConfig(msg.to_string())
}
