//! The slice of a case payload the timer model reads.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{compact_order, progress_order, SlaTimer, SlaTimerStatus};
use crate::utils::lenient;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CasePayload {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    /// Entries that cannot be read at all (no id, not an object) are dropped.
    #[serde(default, deserialize_with = "lenient::skip_invalid")]
    pub sla_timers: Vec<SlaTimer>,
}

impl CasePayload {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse case payload")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read case payload {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("in {}", path.display()))
    }

    pub fn compact_timers(&self, now: DateTime<Utc>, limit: usize) -> Vec<&SlaTimer> {
        compact_order(&self.sla_timers, now, limit)
    }

    pub fn progress_timers(&self, now: DateTime<Utc>) -> Vec<&SlaTimer> {
        progress_order(&self.sla_timers, now)
    }

    pub fn has_running_timers(&self) -> bool {
        self.sla_timers
            .iter()
            .any(|timer| timer.status == SlaTimerStatus::Running)
    }
}
