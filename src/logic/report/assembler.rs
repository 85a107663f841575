//! Report Assembler
//!
//! Flattens explained rows into output records and attaches the
//! recommended action for each cause.

use std::collections::BTreeSet;

use super::types::ReportRecord;
use super::Report;
use crate::logic::cause::{ActionPlaybook, CauseLabel};
use crate::logic::config::ReportConfig;
use crate::logic::cost::ExplainedRow;
use crate::logic::error::{PipelineWarning, WarningCounts};

pub struct ReportAssembler<'a> {
    config: ReportConfig,
    playbook: &'a ActionPlaybook,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(config: ReportConfig, playbook: &'a ActionPlaybook) -> Self {
        Self { config, playbook }
    }

    /// One record per row, in input order
    ///
    /// Each cause missing from the playbook is warned about once per run.
    pub fn assemble(&self, rows: Vec<ExplainedRow>, rate: f64, warnings: &mut WarningCounts) -> Report {
        let mut unmapped: BTreeSet<CauseLabel> = BTreeSet::new();

        let records: Vec<ReportRecord> = rows
            .into_iter()
            .map(|row| {
                let recommended_action = row.classified.cause.map(|cause| {
                    let action = self.playbook.resolve(cause);
                    if !action.mapped {
                        unmapped.insert(cause);
                    }
                    action.text.to_string()
                });
                to_record(row, recommended_action)
            })
            .collect();

        for cause in unmapped {
            warnings.record(PipelineWarning::UnmappedCause { cause });
        }

        log::debug!("Report assembler: {} records", records.len());
        Report::new(records, rate, self.config.clone())
    }
}

fn to_record(row: ExplainedRow, recommended_action: Option<String>) -> ReportRecord {
    let ExplainedRow {
        classified,
        baseline,
        excess_energy,
        excess_cost,
    } = row;
    let scored = classified.scored;
    let features = scored.features;

    ReportRecord {
        timestamp: features.timestamp,
        energy: features.energy,
        hour: features.hour,
        day_of_week: features.day_of_week,
        is_weekend: features.is_weekend,
        is_overnight: features.is_overnight,
        rolling_mean: features.rolling_mean,
        rolling_std: features.rolling_std,
        is_anomaly: scored.is_anomaly,
        z_score: scored.severity.z_score,
        baseline,
        excess_energy,
        excess_cost,
        cause: classified.cause,
        priority: classified.priority,
        recommended_action,
    }
}
