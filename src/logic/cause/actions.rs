//! Recommended Actions Playbook
//!
//! Cause → operator action text. Causes missing from a playbook resolve to
//! the fallback text and are reported as unmapped.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::types::CauseLabel;
use crate::logic::error::{PipelineError, PipelineResult};

pub const DEFAULT_FALLBACK_ACTION: &str = "Review energy trends and investigate potential causes.";

/// Standard building-automation guidance per cause
fn standard_action(cause: CauseLabel) -> &'static str {
    match cause {
        CauseLabel::AfterHoursHvac => {
            "Check BAS occupancy schedule & overrides. Verify AHU/VAV start-stop times; look for manual override left ON."
        }
        CauseLabel::WeekendOverride => {
            "Verify weekend/holiday schedule and after-hours requests. Check if equipment is scheduled to run unnecessarily."
        }
        CauseLabel::SuddenSpike => {
            "Check alarms and trend logs around this time. Verify major equipment starts (AHU/chiller/boiler), demand events, or meter anomalies."
        }
        CauseLabel::LoadDrop => {
            "Confirm planned shutdown/holiday. If unplanned, check for equipment trips, power issues, or meter/data gaps."
        }
        CauseLabel::Atypical => {
            "Inspect trend plots before/after. Compare to similar days (same day-of-week/hour). Check recent control changes or maintenance work."
        }
    }
}

/// Action looked up for one cause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAction<'a> {
    pub text: &'a str,
    /// false when the fallback was used
    pub mapped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlaybook {
    actions: BTreeMap<CauseLabel, String>,
    fallback: String,
}

/// On-disk playbook: keys are cause labels or rule codes
#[derive(Debug, Deserialize)]
struct PlaybookFile {
    #[serde(default)]
    actions: BTreeMap<String, String>,
    fallback: Option<String>,
}

impl ActionPlaybook {
    /// Every cause mapped
    pub fn standard() -> Self {
        Self {
            actions: CauseLabel::ALL
                .iter()
                .map(|c| (*c, standard_action(*c).to_string()))
                .collect(),
            fallback: DEFAULT_FALLBACK_ACTION.to_string(),
        }
    }

    pub fn new(actions: BTreeMap<CauseLabel, String>, fallback: impl Into<String>) -> PipelineResult<Self> {
        let fallback = fallback.into();
        if fallback.trim().is_empty() {
            return Err(PipelineError::InvalidPlaybook("fallback action must not be empty".to_string()));
        }
        if let Some((cause, _)) = actions.iter().find(|(_, text)| text.trim().is_empty()) {
            return Err(PipelineError::InvalidPlaybook(format!("empty action for {:?}", cause.label())));
        }
        Ok(Self { actions, fallback })
    }

    pub fn from_json_str(raw: &str) -> PipelineResult<Self> {
        let file: PlaybookFile = serde_json::from_str(raw)?;
        let mut actions = BTreeMap::new();
        for (key, text) in file.actions {
            let cause: CauseLabel = key.parse().map_err(PipelineError::InvalidPlaybook)?;
            actions.insert(cause, text);
        }
        Self::new(actions, file.fallback.unwrap_or_else(|| DEFAULT_FALLBACK_ACTION.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn resolve(&self, cause: CauseLabel) -> ResolvedAction<'_> {
        match self.actions.get(&cause) {
            Some(text) => ResolvedAction { text, mapped: true },
            None => ResolvedAction {
                text: &self.fallback,
                mapped: false,
            },
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

impl Default for ActionPlaybook {
    fn default() -> Self {
        Self::standard()
    }
}
