//! Cost Module - Cost Estimator
//!
//! Long-window (billing) baseline, excess energy on anomalous hours, and
//! its monetary value at a per-run rate. This baseline is separate from
//! the short window used for severity.

use crate::logic::cause::ClassifiedRow;
use crate::logic::config::CostConfig;
use crate::logic::features::rolling::rolling_mean;

/// ClassifiedRow plus baseline, excess energy and cost
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainedRow {
    pub classified: ClassifiedRow,
    /// `None` when the long window had too few samples
    pub baseline: Option<f64>,
    /// kWh above baseline; 0 for non-anomalous rows, negative on drops
    pub excess_energy: f64,
    pub excess_cost: f64,
}

impl ExplainedRow {
    pub fn is_anomaly(&self) -> bool {
        self.classified.scored.is_anomaly
    }

    /// Same row billed at another rate
    pub fn repriced(&self, rate: f64) -> Self {
        Self {
            excess_cost: excess_cost(self.excess_energy, rate),
            ..self.clone()
        }
    }
}

/// Readings are hourly, so one kW sustained for the hour is one kWh
pub fn excess_energy(energy: f64, baseline: Option<f64>, is_anomaly: bool) -> f64 {
    if !is_anomaly {
        return 0.0;
    }
    match baseline {
        Some(b) => energy - b,
        None => 0.0,
    }
}

pub fn excess_cost(excess_kwh: f64, rate: f64) -> f64 {
    excess_kwh * rate
}

pub struct CostEstimator {
    config: CostConfig,
}

impl CostEstimator {
    pub fn new(config: CostConfig) -> Self {
        Self { config }
    }

    pub fn rate(&self) -> f64 {
        self.config.rate
    }

    /// Trailing mean over the energies of the given rows
    pub fn long_baseline(&self, energies: &[f64]) -> Vec<Option<f64>> {
        rolling_mean(energies, self.config.long_window, self.config.long_min_periods)
    }

    /// Baseline window runs over the rows themselves, so readings dropped
    /// as short-window warm-up never enter it
    pub fn estimate(&self, rows: Vec<ClassifiedRow>) -> Vec<ExplainedRow> {
        let energies: Vec<f64> = rows.iter().map(|r| r.scored.features.energy).collect();
        let baselines = self.long_baseline(&energies);

        let explained: Vec<ExplainedRow> = rows
            .into_iter()
            .zip(baselines)
            .map(|(classified, baseline)| {
                let features = &classified.scored.features;
                let excess = excess_energy(features.energy, baseline, classified.scored.is_anomaly);
                ExplainedRow {
                    baseline,
                    excess_energy: excess,
                    excess_cost: excess_cost(excess, self.config.rate),
                    classified,
                }
            })
            .collect();

        log::debug!(
            "Cost estimator: {} rows without baseline",
            explained.iter().filter(|r| r.baseline.is_none()).count()
        );
        explained
    }
}
