//! Feature Builder
//!
//! Raw readings → calendar features + short-window rolling statistics.
//! Rows without a full rolling window are dropped, never padded.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};

use super::rolling::rolling_stats;
use super::types::{CadenceReport, FeatureRow, FeatureSet, Reading};
use crate::logic::config::FeatureConfig;
use crate::logic::error::{PipelineError, PipelineResult};

/// Hours counted as overnight (inclusive)
const OVERNIGHT_START: u32 = 0;
const OVERNIGHT_END: u32 = 6;

/// Saturday, counting Monday = 0
const FIRST_WEEKEND_DAY: u32 = 5;

pub struct FeatureBuilder {
    config: FeatureConfig,
}

impl FeatureBuilder {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Derive feature rows from an unordered reading series
    pub fn build(&self, readings: &[Reading]) -> PipelineResult<FeatureSet> {
        let total = readings.len();

        // 1. Drop missing power, sort ascending
        let mut valid: Vec<(NaiveDateTime, f64)> = readings
            .iter()
            .filter_map(|r| r.valid_energy().map(|e| (r.timestamp, e)))
            .collect();
        let dropped_missing = total - valid.len();
        valid.sort_by_key(|(ts, _)| *ts);

        if valid.len() < self.config.short_min_periods {
            return Err(PipelineError::InsufficientHistory {
                required: self.config.short_min_periods,
                actual: valid.len(),
            });
        }

        let cadence = cadence_report(&valid);
        let series: Vec<f64> = valid.iter().map(|(_, e)| *e).collect();

        // 2. Rolling stats (trailing, current sample included)
        let stats = rolling_stats(&series, self.config.short_window, self.config.short_min_periods);

        // 3. Keep rows with both mean and std defined
        let rows: Vec<FeatureRow> = valid
            .iter()
            .zip(stats)
            .enumerate()
            .filter_map(|(position, ((timestamp, energy), stat))| {
                let stat = stat?;
                let rolling_std = stat.std?;
                Some(feature_row(position, *timestamp, *energy, stat.mean, rolling_std))
            })
            .collect();

        let dropped_warmup = series.len() - rows.len();
        log::debug!(
            "Feature builder: {} readings, {} missing, {} warm-up, {} rows",
            total,
            dropped_missing,
            dropped_warmup,
            rows.len()
        );

        Ok(FeatureSet {
            rows,
            series,
            cadence,
            dropped_missing,
            dropped_warmup,
        })
    }
}

fn feature_row(position: usize, timestamp: NaiveDateTime, energy: f64, mean: f64, std: f64) -> FeatureRow {
    let hour = timestamp.hour();
    let day_of_week = timestamp.weekday().num_days_from_monday();

    FeatureRow {
        position,
        timestamp,
        energy,
        hour,
        day_of_week,
        is_weekend: day_of_week >= FIRST_WEEKEND_DAY,
        is_overnight: (OVERNIGHT_START..=OVERNIGHT_END).contains(&hour),
        rolling_mean: mean,
        rolling_std: std,
    }
}

/// Count step sizes between consecutive sorted readings
fn cadence_report(sorted: &[(NaiveDateTime, f64)]) -> CadenceReport {
    let mut report = CadenceReport::default();
    for pair in sorted.windows(2) {
        let step = pair[1].0 - pair[0].0;
        if step == Duration::hours(1) {
            report.hourly_steps += 1;
        } else if step == Duration::zero() {
            report.duplicate_timestamps += 1;
        } else {
            report.irregular_gaps += 1;
        }
    }
    report
}
