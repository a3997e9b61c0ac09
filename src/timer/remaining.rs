//! Live remaining time for a timer snapshot.
//!
//! The backend ticks timers periodically; between ticks a running timer is
//! extrapolated from `lastTickAt` so the display can count down every second
//! without polling.

use chrono::{DateTime, Utc};

use crate::utils::time::{elapsed_ms, parse_optional_timestamp};
use crate::{log_debug, log_warn};

use super::{SlaTimer, SlaTimerStatus};

const ENABLE_LOGS: bool = true;

/// Remaining milliseconds before clamping. Negative once a running timer has
/// passed its goal but the server has not yet reported `Breached`.
pub fn raw_remaining_ms(timer: &SlaTimer, now: DateTime<Utc>) -> i64 {
    let server = timer.server_remaining_ms();
    match timer.status {
        SlaTimerStatus::Running => match last_tick(timer) {
            Some(anchor) => server.saturating_sub(elapsed_ms(anchor, now)),
            None => server,
        },
        SlaTimerStatus::Paused
        | SlaTimerStatus::Stopped
        | SlaTimerStatus::Met
        | SlaTimerStatus::Breached
        | SlaTimerStatus::Unknown => server,
    }
}

/// Remaining milliseconds to display, never below zero.
pub fn remaining_ms(timer: &SlaTimer, now: DateTime<Utc>) -> i64 {
    raw_remaining_ms(timer, now).max(0)
}

/// Whether the timer should be shown as breached.
///
/// `Breached` from the server always counts. Otherwise a known remaining
/// figure at or below zero counts: extrapolated for running timers, the
/// frozen server value for paused and unrecognised ones. Met and stopped
/// timers finished inside their goal by definition. A snapshot without a
/// remaining figure never signals a breach.
pub fn is_breached(timer: &SlaTimer, now: DateTime<Utc>) -> bool {
    match timer.status {
        SlaTimerStatus::Breached => true,
        SlaTimerStatus::Running | SlaTimerStatus::Paused | SlaTimerStatus::Unknown => {
            timer.remaining_ms.is_some() && raw_remaining_ms(timer, now) <= 0
        }
        SlaTimerStatus::Stopped | SlaTimerStatus::Met => false,
    }
}

fn last_tick(timer: &SlaTimer) -> Option<DateTime<Utc>> {
    match parse_optional_timestamp(timer.last_tick_at.as_deref(), "lastTickAt") {
        Ok(Some(anchor)) => Some(anchor),
        Ok(None) => {
            log_debug!("timer {} is running without lastTickAt; not extrapolating", timer.id);
            None
        }
        Err(err) => {
            log_warn!("timer {}: {:#}", timer.id, err);
            None
        }
    }
}
