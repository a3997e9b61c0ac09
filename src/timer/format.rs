use serde::{Deserialize, Serialize};

use super::{SlaTimer, SlaTimerStatus};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Compact duration using the coarsest unit and at most two units.
///
/// `90_000` -> "1m 30s", `90_000_000` -> "1d 1h", negative -> "Breached".
pub fn format_duration(ms: i64) -> String {
    if ms < 0 {
        return "Breached".to_string();
    }

    let days = ms / MS_PER_DAY;
    let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Urgency tier the rendering layer maps to colours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SeverityTier {
    /// Server reported a breach.
    Breached,
    /// Met or stopped.
    Resolved,
    /// Paused.
    Muted,
    /// Running with at most the urgent share of the goal left.
    Urgent,
    Critical,
    Warning,
    Normal,
}

impl SeverityTier {
    pub fn is_pulsing(&self) -> bool {
        matches!(self, SeverityTier::Breached | SeverityTier::Urgent)
    }

    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            SeverityTier::Breached | SeverityTier::Urgent | SeverityTier::Critical
        )
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            SeverityTier::Breached => "sla-breached",
            SeverityTier::Resolved => "sla-resolved",
            SeverityTier::Muted => "sla-muted",
            SeverityTier::Urgent => "sla-urgent",
            SeverityTier::Critical => "sla-critical",
            SeverityTier::Warning => "sla-warning",
            SeverityTier::Normal => "sla-normal",
        }
    }
}

/// Percent-of-goal cut-offs for running timers, inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeverityThresholds {
    pub urgent_percent: f64,
    pub critical_percent: f64,
    pub warning_percent: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            urgent_percent: 10.0,
            critical_percent: 25.0,
            warning_percent: 50.0,
        }
    }
}

impl SeverityThresholds {
    pub fn is_valid(&self) -> bool {
        let ordered = 0.0 < self.urgent_percent
            && self.urgent_percent <= self.critical_percent
            && self.critical_percent <= self.warning_percent
            && self.warning_percent <= 100.0;
        ordered
            && self.urgent_percent.is_finite()
            && self.critical_percent.is_finite()
            && self.warning_percent.is_finite()
    }
}

/// Share of the goal still remaining, unclamped. A zero or missing goal
/// counts as 100% so such timers never look urgent.
pub fn percentage_of_goal(remaining_ms: i64, goal_ms: Option<u64>) -> f64 {
    match goal_ms {
        Some(goal) if goal > 0 => remaining_ms as f64 * 100.0 / goal as f64,
        _ => 100.0,
    }
}

/// [`percentage_of_goal`] clamped to `0..=100` for progress bars.
pub fn percentage_remaining(remaining_ms: i64, goal_ms: Option<u64>) -> f64 {
    percentage_of_goal(remaining_ms, goal_ms).clamp(0.0, 100.0)
}

pub fn severity_tier(timer: &SlaTimer, remaining_ms: i64) -> SeverityTier {
    severity_tier_with(timer, remaining_ms, &SeverityThresholds::default())
}

pub fn severity_tier_with(
    timer: &SlaTimer,
    remaining_ms: i64,
    thresholds: &SeverityThresholds,
) -> SeverityTier {
    match timer.status {
        SlaTimerStatus::Breached => SeverityTier::Breached,
        SlaTimerStatus::Met | SlaTimerStatus::Stopped => SeverityTier::Resolved,
        SlaTimerStatus::Paused => SeverityTier::Muted,
        SlaTimerStatus::Unknown => SeverityTier::Resolved,
        SlaTimerStatus::Running => {
            let percentage = percentage_of_goal(remaining_ms, timer.goal_ms());
            if percentage <= thresholds.urgent_percent {
                SeverityTier::Urgent
            } else if percentage <= thresholds.critical_percent {
                SeverityTier::Critical
            } else if percentage <= thresholds.warning_percent {
                SeverityTier::Warning
            } else {
                SeverityTier::Normal
            }
        }
    }
}
