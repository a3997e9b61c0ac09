use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::utils::lenient;

/// Server-owned timer status. Transitions happen on the backend; the client
/// only renders whichever value the latest snapshot carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SlaTimerStatus {
    Running,
    Paused,
    Stopped,
    Breached,
    Met,
    /// Any status string this build does not recognise.
    #[serde(other)]
    Unknown,
}

impl SlaTimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaTimerStatus::Running => "Running",
            SlaTimerStatus::Paused => "Paused",
            SlaTimerStatus::Stopped => "Stopped",
            SlaTimerStatus::Breached => "Breached",
            SlaTimerStatus::Met => "Met",
            SlaTimerStatus::Unknown => "Unknown",
        }
    }

    /// Running or paused: the clock still counts toward the goal.
    pub fn is_active(&self) -> bool {
        matches!(self, SlaTimerStatus::Running | SlaTimerStatus::Paused)
    }

    /// Stopped, met or breached: `remaining_ms` is frozen.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SlaTimerStatus::Stopped | SlaTimerStatus::Met | SlaTimerStatus::Breached
        )
    }
}

impl Default for SlaTimerStatus {
    fn default() -> Self {
        SlaTimerStatus::Unknown
    }
}

impl fmt::Display for SlaTimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlaTimerStatus {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "Running" => Ok(SlaTimerStatus::Running),
            "Paused" => Ok(SlaTimerStatus::Paused),
            "Stopped" => Ok(SlaTimerStatus::Stopped),
            "Breached" => Ok(SlaTimerStatus::Breached),
            "Met" => Ok(SlaTimerStatus::Met),
            other => Err(anyhow!("unknown SLA timer status {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlaTarget {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub name: String,
    /// Duration budget. Absent for targets that only track, never breach.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub goal_ms: Option<u64>,
}

/// Snapshot of one SLA timer as delivered inside a case payload.
///
/// Timestamps stay as the raw RFC 3339 strings the backend sent: a malformed
/// value must only blank out the figure derived from it, not reject the case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlaTimer {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub case_id: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub target_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub target: Option<SlaTarget>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: SlaTimerStatus,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub last_tick_at: Option<String>,
    /// `None` when the backend sent no usable figure.
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub remaining_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub paused_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resumed_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::u64_or_zero")]
    pub total_paused_ms: u64,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub breached_at: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub stopped_at: Option<String>,
}

impl SlaTimer {
    /// Last server figure, zero when the backend sent none.
    pub fn server_remaining_ms(&self) -> i64 {
        self.remaining_ms.unwrap_or(0)
    }

    /// Goal budget of the embedded target, if any.
    pub fn goal_ms(&self) -> Option<u64> {
        self.target.as_ref().and_then(|target| target.goal_ms)
    }

    /// Target name for display, falling back to the target id.
    pub fn display_name(&self) -> &str {
        self.target
            .as_ref()
            .map(|target| target.name.as_str())
            .filter(|name| !name.trim().is_empty())
            .or(self.target_id.as_deref())
            .or_else(|| self.target.as_ref().map(|target| target.id.as_str()))
            .unwrap_or("SLA")
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_snapshot() {
        let json = r#"{
            "id": "t-1",
            "caseId": "c-9",
            "targetId": "sla-resp",
            "target": { "id": "sla-resp", "name": "Response", "goalMs": 7200000 },
            "status": "Paused",
            "startedAt": "2024-06-01T08:00:00Z",
            "remainingMs": 5400000,
            "pausedAt": "2024-06-01T08:30:00Z",
            "totalPausedMs": 0
        }"#;

        let timer: SlaTimer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.status, SlaTimerStatus::Paused);
        assert_eq!(timer.goal_ms(), Some(7_200_000));
        assert_eq!(timer.display_name(), "Response");
        assert!(timer.last_tick_at.is_none());
    }

    #[test]
    fn unrecognised_status_maps_to_unknown() {
        let json = r#"{ "id": "t-2", "caseId": "c-1", "status": "Escalated", "remainingMs": 10 }"#;
        let timer: SlaTimer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.status, SlaTimerStatus::Unknown);
    }

    #[test]
    fn malformed_timestamp_still_deserializes() {
        let json = r#"{ "id": "t-3", "caseId": "c-1", "status": "Running",
                        "startedAt": "not a date", "remainingMs": 1000 }"#;
        let timer: SlaTimer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.started_at.as_deref(), Some("not a date"));
    }

    #[test]
    fn nulls_and_odd_numbers_only_blank_their_field() {
        let json = r#"{
            "id": "t-4",
            "caseId": "c-1",
            "target": { "id": "sla-x", "name": null, "goalMs": -60000 },
            "status": null,
            "startedAt": null,
            "remainingMs": 5000.75,
            "totalPausedMs": null
        }"#;

        let timer: SlaTimer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.status, SlaTimerStatus::Unknown);
        assert_eq!(timer.remaining_ms, Some(5000));
        assert_eq!(timer.total_paused_ms, 0);
        assert_eq!(timer.goal_ms(), None);
        assert_eq!(timer.display_name(), "sla-x");
        assert!(timer.started_at.is_none());
    }

    #[test]
    fn missing_remaining_reads_as_zero() {
        let json = r#"{ "id": "t-5", "caseId": "c-1", "status": "Met", "remainingMs": null }"#;
        let timer: SlaTimer = serde_json::from_str(json).unwrap();
        assert_eq!(timer.remaining_ms, None);
        assert_eq!(timer.server_remaining_ms(), 0);
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            SlaTimerStatus::Running,
            SlaTimerStatus::Paused,
            SlaTimerStatus::Stopped,
            SlaTimerStatus::Breached,
            SlaTimerStatus::Met,
        ] {
            assert_eq!(status.as_str().parse::<SlaTimerStatus>().unwrap(), status);
        }
        assert!("Unknown".parse::<SlaTimerStatus>().is_err());
    }

    #[test]
    fn status_classification() {
        assert!(SlaTimerStatus::Running.is_active());
        assert!(SlaTimerStatus::Paused.is_active());
        assert!(!SlaTimerStatus::Met.is_active());
        assert!(SlaTimerStatus::Breached.is_terminal());
        assert!(!SlaTimerStatus::Unknown.is_terminal());
    }

    #[test]
    fn display_name_fallbacks() {
        let mut timer = fixtures::timer(SlaTimerStatus::Running, 0);
        timer.target.as_mut().unwrap().name = "  ".into();
        assert_eq!(timer.display_name(), "target-1");

        timer.target = None;
        timer.target_id = None;
        assert_eq!(timer.display_name(), "SLA");
    }
}
