//! Report Views
//!
//! Read-only projections over the assembled table: top anomalies,
//! high-severity hours, impact by cause, the cost-ordered anomaly log,
//! KPIs, and a rate what-if that never re-runs detection.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::types::{round2, CauseImpact, Kpis, ReportRecord};
use crate::logic::cause::CauseLabel;
use crate::logic::config::{validate_rate, ReportConfig};
use crate::logic::cost::excess_cost;
use crate::logic::error::PipelineResult;

/// Assembled per-hour table plus the rate its costs were computed at
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub records: Vec<ReportRecord>,
    pub rate: f64,
    pub config: ReportConfig,
}

/// Row selection, as applied by the dashboard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
    /// Restricts anomalous rows to these causes; normal rows always pass
    pub causes: Option<BTreeSet<CauseLabel>>,
    /// Keep only anomalies with a defined z at or above the high-severity threshold
    pub high_severity_only: bool,
}

impl ReportFilter {
    pub fn matches(&self, record: &ReportRecord, high_severity_z: f64) -> bool {
        let day = record.timestamp.date();
        if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
            return false;
        }
        if self.high_severity_only && !record.is_high_severity(high_severity_z) {
            return false;
        }
        match (&self.causes, record.cause) {
            (Some(causes), Some(cause)) if record.is_anomaly => causes.contains(&cause),
            _ => true,
        }
    }
}

/// z descending; ties keep timestamp order
fn by_severity_desc(a: &&ReportRecord, b: &&ReportRecord) -> Ordering {
    b.z_score.total_cmp(&a.z_score)
}

fn by_cost_desc(a: &&ReportRecord, b: &&ReportRecord) -> Ordering {
    b.excess_cost.total_cmp(&a.excess_cost)
}

impl Report {
    pub fn new(records: Vec<ReportRecord>, rate: f64, config: ReportConfig) -> Self {
        Self { records, rate, config }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &ReportRecord> {
        self.records.iter().filter(|r| r.is_anomaly)
    }

    /// Configured number of anomalies with the largest z
    pub fn top_anomalies(&self) -> Vec<&ReportRecord> {
        self.top_n(self.config.top_n)
    }

    pub fn top_n(&self, n: usize) -> Vec<&ReportRecord> {
        let mut top: Vec<&ReportRecord> = self.anomalies().collect();
        top.sort_by(by_severity_desc);
        top.truncate(n);
        top
    }

    /// Anomalies with a defined z at or above the configured threshold
    pub fn high_severity(&self) -> Vec<&ReportRecord> {
        let threshold = self.config.high_severity_z;
        self.records
            .iter()
            .filter(|r| r.is_high_severity(threshold))
            .collect()
    }

    /// Anomalies ordered by cost, most expensive first
    pub fn anomaly_log(&self) -> Vec<&ReportRecord> {
        let mut log: Vec<&ReportRecord> = self.anomalies().collect();
        log.sort_by(by_cost_desc);
        log
    }

    /// Excess energy and cost per cause, most expensive first
    pub fn impact_by_cause(&self) -> Vec<CauseImpact> {
        let mut groups: BTreeMap<CauseLabel, CauseImpact> = BTreeMap::new();
        for record in self.anomalies() {
            let Some(cause) = record.cause else { continue };
            let entry = groups.entry(cause).or_insert(CauseImpact {
                cause,
                count: 0,
                excess_energy: 0.0,
                excess_cost: 0.0,
            });
            entry.count += 1;
            entry.excess_energy += record.excess_energy;
            entry.excess_cost += record.excess_cost;
        }

        let mut impacts: Vec<CauseImpact> = groups.into_values().collect();
        impacts.sort_by(|a, b| b.excess_cost.total_cmp(&a.excess_cost));
        impacts
    }

    pub fn kpis(&self) -> Kpis {
        let (count, excess, cost) = self
            .anomalies()
            .fold((0usize, 0.0, 0.0), |(n, e, c), r| (n + 1, e + r.excess_energy, c + r.excess_cost));

        Kpis {
            total_anomalies: count,
            total_excess_kwh: round2(excess),
            total_cost: round2(cost),
            avg_cost_per_anomaly: if count > 0 { round2(cost / count as f64) } else { 0.0 },
        }
    }

    /// Same table billed at another rate
    pub fn reprice(&self, rate: f64) -> PipelineResult<Report> {
        validate_rate(rate)?;
        let records = self
            .records
            .iter()
            .map(|r| ReportRecord {
                excess_cost: excess_cost(r.excess_energy, rate),
                ..r.clone()
            })
            .collect();
        log::info!("Repriced {} records at {} per kWh", self.records.len(), rate);
        Ok(Report::new(records, rate, self.config.clone()))
    }

    /// Subset of rows, views and KPIs then apply to the subset
    pub fn filtered(&self, filter: &ReportFilter) -> Report {
        let threshold = self.config.high_severity_z;
        let records = self
            .records
            .iter()
            .filter(|r| filter.matches(r, threshold))
            .cloned()
            .collect();
        Report::new(records, self.rate, self.config.clone())
    }
}
