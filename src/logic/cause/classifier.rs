//! Cause Classifier
//!
//! Only classify logic - no types, no thresholds.
//! Input: ScoredRow. Output: ClassifiedRow (pure mapping, input untouched).

use super::rules::{CauseThresholds, CAUSE_RULES, FALLBACK_CAUSE};
use super::types::{CauseLabel, ClassifiedRow, Priority};
use crate::logic::severity::ScoredRow;

/// First matching rule wins; non-anomalous rows get no cause
pub fn classify_cause(row: &ScoredRow, thresholds: &CauseThresholds) -> Option<CauseLabel> {
    if !row.is_anomaly {
        return None;
    }

    let cause = CAUSE_RULES
        .iter()
        .find(|rule| (rule.applies)(row, thresholds))
        .map(|rule| rule.cause)
        .unwrap_or(FALLBACK_CAUSE);

    Some(cause)
}

/// Priority tier from z alone
pub fn priority(z_score: f64, thresholds: &CauseThresholds) -> Priority {
    if z_score >= thresholds.high_priority_z {
        Priority::High
    } else if z_score >= thresholds.medium_priority_z {
        Priority::Medium
    } else {
        Priority::Low
    }
}

pub fn classify_row(row: ScoredRow, thresholds: &CauseThresholds) -> ClassifiedRow {
    let cause = classify_cause(&row, thresholds);
    let priority = priority(row.z_score(), thresholds);
    ClassifiedRow {
        scored: row,
        cause,
        priority,
    }
}

pub fn classify_rows(rows: Vec<ScoredRow>, thresholds: &CauseThresholds) -> Vec<ClassifiedRow> {
    let classified: Vec<ClassifiedRow> = rows.into_iter().map(|r| classify_row(r, thresholds)).collect();
    log::debug!(
        "Cause classifier: {} anomalous rows explained",
        classified.iter().filter(|r| r.cause.is_some()).count()
    );
    classified
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureRow;
    use crate::logic::severity::{severity, ScoredRow};
    use chrono::NaiveDate;

    fn scored(energy: f64, mean: f64, std: f64, overnight: bool, weekend: bool, anomaly: bool) -> ScoredRow {
        let features = FeatureRow {
            position: 40,
            timestamp: NaiveDate::from_ymd_opt(2016, 1, 9).unwrap().and_hms_opt(3, 0, 0).unwrap(),
            energy,
            hour: 3,
            day_of_week: 5,
            is_weekend: weekend,
            is_overnight: overnight,
            rolling_mean: mean,
            rolling_std: std,
        };
        ScoredRow {
            severity: severity(energy, mean, std),
            features,
            is_anomaly: anomaly,
            anomaly_score: 0.7,
        }
    }

    #[test]
    fn test_example_overnight_medium() {
        // z = 3.0
        let row = scored(50.0, 20.0, 10.0, true, false, true);
        let result = classify_row(row, &CauseThresholds::default());
        assert_eq!(result.priority, Priority::Medium);
        assert_eq!(result.cause, Some(CauseLabel::AfterHoursHvac));
        assert_eq!(result.cause.unwrap().label(), "After hours HVAC running");
    }

    #[test]
    fn test_overnight_beats_weekend() {
        let row = scored(40.0, 20.0, 10.0, true, true, true);
        assert_eq!(classify_cause(&row, &CauseThresholds::default()), Some(CauseLabel::AfterHoursHvac));
    }

    #[test]
    fn test_weekend_spike() {
        let row = scored(40.0, 20.0, 10.0, false, true, true);
        assert_eq!(classify_cause(&row, &CauseThresholds::default()), Some(CauseLabel::WeekendOverride));
    }

    #[test]
    fn test_overnight_below_spike_falls_through() {
        // z = 1.0: overnight but not a spike
        let row = scored(30.0, 20.0, 10.0, true, false, true);
        assert_eq!(classify_cause(&row, &CauseThresholds::default()), Some(CauseLabel::Atypical));
    }

    #[test]
    fn test_big_spike_and_drop() {
        let t = CauseThresholds::default();
        let spike = scored(46.0, 20.0, 10.0, false, false, true);
        assert_eq!(classify_cause(&spike, &t), Some(CauseLabel::SuddenSpike));

        let drop = scored(5.0, 20.0, 10.0, true, true, true);
        assert_eq!(classify_cause(&drop, &t), Some(CauseLabel::LoadDrop));
    }

    #[test]
    fn test_normal_rows_have_no_cause() {
        let row = scored(90.0, 20.0, 10.0, true, true, false);
        let result = classify_row(row, &CauseThresholds::default());
        assert_eq!(result.cause, None);
        assert_eq!(result.priority, Priority::High);
    }

    #[test]
    fn test_indeterminate_row_is_atypical_low() {
        let row = scored(90.0, 20.0, 0.0, true, true, true);
        let result = classify_row(row, &CauseThresholds::default());
        assert_eq!(result.cause, Some(CauseLabel::Atypical));
        assert_eq!(result.priority, Priority::Low);
    }

    #[test]
    fn test_priority_monotonic() {
        let t = CauseThresholds::default();
        let mut last_rank = 0;
        for i in -50..80 {
            let z = i as f64 * 0.1;
            let rank = priority(z, &t).rank();
            assert!(rank >= last_rank);
            last_rank = rank;
        }
        assert_eq!(priority(3.5, &t), Priority::High);
        assert_eq!(priority(10.0, &t), Priority::High);
        assert_eq!(priority(2.5, &t), Priority::Medium);
        assert_eq!(priority(2.49, &t), Priority::Low);
    }
}
