use chrono::{DateTime, Utc};
use serde::Serialize;

use super::breach::{format_projected_breach, projected_breach_at};
use super::format::{
    format_duration, percentage_remaining, severity_tier_with, SeverityThresholds, SeverityTier,
};
use super::remaining::{is_breached, remaining_ms};
use super::{SlaTimer, SlaTimerStatus};

/// Everything one rendered timer needs, derived from a snapshot at `now`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerDisplay {
    pub timer_id: String,
    pub name: String,
    pub status: SlaTimerStatus,
    pub remaining_ms: i64,
    pub remaining_label: String,
    pub tier: SeverityTier,
    pub tier_class: &'static str,
    pub breached: bool,
    pub percent_remaining: f64,
    pub projected_breach_at: Option<DateTime<Utc>>,
    pub projected_breach_label: String,
    pub computed_at: DateTime<Utc>,
}

impl TimerDisplay {
    pub fn from_timer(
        timer: &SlaTimer,
        now: DateTime<Utc>,
        thresholds: &SeverityThresholds,
    ) -> Self {
        let remaining = remaining_ms(timer, now);
        let breached = is_breached(timer, now);
        let projected = projected_breach_at(timer, now);

        let remaining_label = if breached {
            format_duration(-1)
        } else {
            format_duration(remaining)
        };
        let tier = severity_tier_with(timer, remaining, thresholds);

        Self {
            timer_id: timer.id.clone(),
            name: timer.display_name().to_string(),
            status: timer.status,
            remaining_ms: remaining,
            remaining_label,
            tier,
            tier_class: tier.class_name(),
            breached,
            percent_remaining: percentage_remaining(remaining, timer.goal_ms()),
            projected_breach_at: projected,
            projected_breach_label: format_projected_breach(projected),
            computed_at: now,
        }
    }

    /// Single-line rendering used by the command-line viewer.
    pub fn summary_line(&self) -> String {
        let marker = if self.tier.is_pulsing() {
            "!"
        } else if self.tier.is_critical() {
            "*"
        } else {
            " "
        };
        format!(
            "{marker} {:<24} {:<9} {:>10} {:>5.1}%  breach: {}",
            self.name,
            self.status.as_str(),
            self.remaining_label,
            self.percent_remaining,
            self.projected_breach_label,
        )
    }
}
