//! Analysis Pipeline
//!
//! Runs the stages strictly in order over one meter series:
//! features → outlier detector → severity → cause → cost → report.
//! Each stage consumes the previous stage's rows and only adds columns.
//! Any fatal error aborts the run before anything is returned for
//! persistence.

use chrono::Utc;
use uuid::Uuid;

use crate::constants::APP_VERSION;
use crate::logic::cause::{classify_rows, ActionPlaybook};
use crate::logic::config::PipelineConfig;
use crate::logic::cost::CostEstimator;
use crate::logic::error::{PipelineResult, PipelineWarning, WarningCounts};
use crate::logic::features::{CadenceReport, FeatureBuilder, LayoutInfo, Reading};
use crate::logic::model::{OutlierDetector, ThresholdStats};
use crate::logic::report::{Report, ReportAssembler, RunSummary};
use crate::logic::severity::score_rows;

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: Report,
    pub config: PipelineConfig,
    pub threshold: ThresholdStats,
    pub cadence: CadenceReport,
    pub warnings: WarningCounts,
    pub input_readings: usize,
    pub dropped_missing: usize,
    pub dropped_warmup: usize,
}

impl PipelineOutput {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            app_version: APP_VERSION.to_string(),
            config: self.config.clone(),
            layout: LayoutInfo::current(),
            input_readings: self.input_readings,
            dropped_missing: self.dropped_missing,
            dropped_warmup: self.dropped_warmup,
            rows: self.report.len(),
            cadence: self.cadence.clone(),
            threshold: self.threshold.clone(),
            warnings: self.warnings.clone(),
            rate: self.report.rate,
            kpis: self.report.kpis(),
            impact_by_cause: self.report.impact_by_cause(),
            top_anomalies: self.report.top_anomalies().into_iter().cloned().collect(),
        }
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    playbook: ActionPlaybook,
}

impl Pipeline {
    /// Rejects invalid configuration up front
    pub fn new(config: PipelineConfig, playbook: ActionPlaybook) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config, playbook })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, readings: &[Reading]) -> PipelineResult<PipelineOutput> {
        let mut warnings = WarningCounts::default();

        // 1. Feature Builder
        let set = FeatureBuilder::new(self.config.features.clone()).build(readings)?;
        if set.cadence.irregular_gaps > 0 {
            warnings.record(PipelineWarning::IrregularCadence {
                gaps: set.cadence.irregular_gaps,
            });
        }
        if set.cadence.duplicate_timestamps > 0 {
            warnings.record(PipelineWarning::DuplicateTimestamp {
                count: set.cadence.duplicate_timestamps,
            });
        }
        log::info!(
            "Features: {} rows ({} missing, {} warm-up dropped)",
            set.rows.len(),
            set.dropped_missing,
            set.dropped_warmup
        );

        // 2. Outlier Detector
        let detection = OutlierDetector::new(self.config.detector.clone()).detect(&set.rows)?;
        log::info!(
            "Detector: {} of {} rows anomalous (cutoff {:.4})",
            detection.anomaly_count(),
            set.rows.len(),
            detection.threshold.cutoff
        );

        // 3. Severity Scorer
        let scored = score_rows(set.rows, &detection, &mut warnings);

        // 4. Cause Classifier
        let classified = classify_rows(scored, &self.config.cause);

        // 5. Cost Estimator
        let explained = CostEstimator::new(self.config.cost.clone()).estimate(classified);

        // 6. Report Assembler
        let report = ReportAssembler::new(self.config.report.clone(), &self.playbook).assemble(
            explained,
            self.config.cost.rate,
            &mut warnings,
        );

        let kpis = report.kpis();
        log::info!(
            "Report: {} anomalies, {:.2} kWh excess, cost {:.2}",
            kpis.total_anomalies,
            kpis.total_excess_kwh,
            kpis.total_cost
        );
        if warnings.total() > 0 {
            log::warn!("Run finished with {} warnings", warnings.total());
        }

        Ok(PipelineOutput {
            report,
            config: self.config.clone(),
            threshold: detection.threshold,
            cadence: set.cadence,
            warnings,
            input_readings: readings.len(),
            dropped_missing: set.dropped_missing,
            dropped_warmup: set.dropped_warmup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::cause::CauseLabel;
    use crate::logic::config::FeatureConfig;
    use crate::logic::error::PipelineError;
    use crate::logic::severity::{severity, SeverityState};
    use chrono::{Duration, NaiveDate};

    /// Three weeks of an office profile: busy weekdays, quiet nights and
    /// weekends, with one large overnight spike and one missing reading
    fn office_readings() -> Vec<Reading> {
        // 2016-02-01 is a Monday
        let start = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        (0..24 * 21)
            .map(|i| {
                let ts = start + Duration::hours(i as i64);
                let hour = i % 24;
                let weekend = (i / 24) % 7 >= 5;
                let base = if !weekend && (8..18).contains(&hour) { 45.0 } else { 18.0 };
                let wiggle = ((i * 13) % 7) as f64 * 0.5;
                match i {
                    100 => Reading::missing(ts),
                    // 03:00 on Friday of the second week
                    267 => Reading::new(ts, 160.0),
                    _ => Reading::new(ts, base + wiggle),
                }
            })
            .collect()
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default(), ActionPlaybook::standard()).unwrap()
    }

    #[test]
    fn test_output_length() {
        let readings = office_readings();
        let output = pipeline().run(&readings).unwrap();

        assert_eq!(output.dropped_missing, 1);
        assert_eq!(output.dropped_warmup, 23);
        assert_eq!(output.report.len(), readings.len() - 1 - 23);
        assert!(output.report.records.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_run_is_deterministic() {
        let readings = office_readings();
        let a = pipeline().run(&readings).unwrap();
        let b = pipeline().run(&readings).unwrap();
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn test_overnight_spike_explained_and_costed() {
        let output = pipeline().run(&office_readings()).unwrap();
        let spike = output
            .report
            .records
            .iter()
            .find(|r| r.energy == 160.0)
            .unwrap();

        assert!(spike.is_anomaly);
        assert!(spike.is_overnight);
        assert_eq!(spike.cause, Some(CauseLabel::AfterHoursHvac));
        assert!(spike.z_score >= 3.5);
        assert_eq!(spike.priority.as_str(), "High");
        assert!(spike.baseline.is_some());
        assert!(spike.excess_energy > 0.0);
        assert!((spike.excess_cost - spike.excess_energy * 0.15).abs() < 1e-9);
        assert!(spike.recommended_action.is_some());
    }

    #[test]
    fn test_normal_rows_have_no_cost_or_cause() {
        let output = pipeline().run(&office_readings()).unwrap();
        for record in output.report.records.iter().filter(|r| !r.is_anomaly) {
            assert_eq!(record.excess_cost, 0.0);
            assert_eq!(record.excess_energy, 0.0);
            assert_eq!(record.cause, None);
            assert_eq!(record.recommended_action, None);
        }
    }

    #[test]
    fn test_missing_reading_counts_as_cadence_gap() {
        let output = pipeline().run(&office_readings()).unwrap();
        assert_eq!(output.cadence.irregular_gaps, 1);
        assert_eq!(output.warnings.irregular_cadence, 1);
        assert_eq!(output.warnings.unmapped_cause, 0);
    }

    /// Readings dropped as warm-up never reach the billing baseline
    #[test]
    fn test_baseline_excludes_warmup_readings() {
        let start = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let readings: Vec<Reading> = (0..24 * 8)
            .map(|i| {
                let energy = if i < 23 { 1000.0 } else { 12.0 + (i % 3) as f64 * 0.5 };
                Reading::new(start + Duration::hours(i as i64), energy)
            })
            .collect();

        let output = pipeline().run(&readings).unwrap();
        let records = &output.report.records;
        assert!(records[..23].iter().all(|r| r.baseline.is_none()));
        assert!(records[..23].iter().all(|r| r.excess_cost == 0.0));

        let baseline = records[23].baseline.unwrap();
        assert!((12.0..=13.0).contains(&baseline), "baseline {} includes warm-up", baseline);
    }

    /// A flat series whose value has no exact binary form is still flat
    #[test]
    fn test_flat_series_is_indeterminate() {
        let start = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let readings: Vec<Reading> = (0..60)
            .map(|i| Reading::new(start + Duration::hours(i as i64), 12.3))
            .collect();

        let output = pipeline().run(&readings).unwrap();
        assert_eq!(output.report.len(), 60 - 23);
        assert_eq!(output.warnings.undefined_severity, output.report.len());
        for record in &output.report.records {
            assert_eq!(record.rolling_std, 0.0);
            assert_eq!(record.z_score, 0.0);
            assert!(!record.severity_defined());
        }

        let set = FeatureBuilder::new(FeatureConfig::default()).build(&readings).unwrap();
        let row = &set.rows[0];
        let s = severity(row.energy, row.rolling_mean, row.rolling_std);
        assert_eq!(s.state, SeverityState::Indeterminate);
        assert_eq!(s.z_score, 0.0);
    }

    #[test]
    fn test_summary() {
        let output = pipeline().run(&office_readings()).unwrap();
        let summary = output.summary();
        assert_eq!(summary.rows, output.report.len());
        assert_eq!(summary.kpis, output.report.kpis());
        assert_eq!(summary.layout, LayoutInfo::current());
        assert!(summary.top_anomalies.len() <= 20);
        assert_eq!(summary.rate, 0.15);
    }

    #[test]
    fn test_fatal_errors() {
        let short: Vec<Reading> = office_readings().into_iter().take(10).collect();
        assert!(matches!(
            pipeline().run(&short),
            Err(PipelineError::InsufficientHistory { required: 24, actual: 10 })
        ));

        let mut config = PipelineConfig::default();
        config.detector.contamination = 0.9;
        assert!(matches!(
            Pipeline::new(config, ActionPlaybook::standard()),
            Err(PipelineError::InvalidConfig(_))
        ));
    }
}
