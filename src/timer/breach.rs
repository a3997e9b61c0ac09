use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

use crate::log_warn;
use crate::utils::time::{elapsed_ms, parse_optional_timestamp, require_timestamp};

use super::{SlaTimer, SlaTimerStatus};

const ENABLE_LOGS: bool = true;

pub const UNAVAILABLE: &str = "Unavailable";

/// Wall-clock instant at which an active timer crosses its goal.
///
/// `None` for breached, resolved and unknown timers, for targets without a
/// goal, and whenever a timestamp needed for the projection is missing or
/// malformed.
pub fn projected_breach_at(timer: &SlaTimer, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match timer.status {
        SlaTimerStatus::Running | SlaTimerStatus::Paused => {}
        SlaTimerStatus::Breached
        | SlaTimerStatus::Stopped
        | SlaTimerStatus::Met
        | SlaTimerStatus::Unknown => return None,
    }
    let goal_ms = timer.goal_ms()?;

    match project(timer, goal_ms, now) {
        Ok(at) => Some(at),
        Err(err) => {
            log_warn!("breach projection unavailable for timer {}: {:#}", timer.id, err);
            None
        }
    }
}

fn project(timer: &SlaTimer, goal_ms: u64, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let started_at = require_timestamp(timer.started_at.as_deref(), "startedAt")?;
    let goal = i64::try_from(goal_ms).unwrap_or(i64::MAX);
    let paused = i64::try_from(timer.total_paused_ms).unwrap_or(i64::MAX);

    // totalPausedMs only grows on resume, so the current pause is added live.
    let live_pause = match timer.status {
        SlaTimerStatus::Paused => {
            parse_optional_timestamp(timer.paused_at.as_deref(), "pausedAt")?
                .map(|paused_at| elapsed_ms(paused_at, now))
                .unwrap_or(0)
        }
        _ => 0,
    };

    let offset_ms = goal
        .saturating_sub(paused)
        .saturating_add(live_pause);
    started_at
        .checked_add_signed(Duration::milliseconds(offset_ms))
        .ok_or_else(|| anyhow::anyhow!("projected instant out of range"))
}

/// Human label for a projection, or "Unavailable".
pub fn format_projected_breach(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%b %-d, %Y %H:%M UTC").to_string(),
        None => UNAVAILABLE.to_string(),
    }
}
