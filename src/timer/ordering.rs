use chrono::{DateTime, Utc};

use super::remaining::remaining_ms;
use super::{SlaTimer, SlaTimerStatus};

/// Timers for the compact badge row, most urgent first.
///
/// Running and paused timers are preferred; when a case has none, the first
/// `limit` timers in payload order are shown instead.
pub fn compact_order<'a>(
    timers: &'a [SlaTimer],
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&'a SlaTimer> {
    let active: Vec<&SlaTimer> = timers.iter().filter(|t| t.status.is_active()).collect();

    let mut chosen: Vec<&SlaTimer> = if active.is_empty() {
        timers.iter().take(limit).collect()
    } else {
        active
    };

    chosen.sort_by_cached_key(|timer| remaining_ms(timer, now));
    chosen.truncate(limit);
    chosen
}

/// Timers for the full progress list: active above resolved, then most
/// urgent first within a status.
pub fn progress_order(timers: &[SlaTimer], now: DateTime<Utc>) -> Vec<&SlaTimer> {
    let mut ordered: Vec<&SlaTimer> = timers.iter().collect();
    ordered.sort_by_cached_key(|timer| (status_priority(timer.status), remaining_ms(timer, now)));
    ordered
}

fn status_priority(status: SlaTimerStatus) -> u8 {
    match status {
        SlaTimerStatus::Running => 0,
        SlaTimerStatus::Paused => 1,
        SlaTimerStatus::Breached => 2,
        SlaTimerStatus::Stopped | SlaTimerStatus::Met => 3,
        SlaTimerStatus::Unknown => 4,
    }
}
