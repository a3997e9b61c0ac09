use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use slatrack_lib::{
    format_projected_breach, projected_breach_at, CasePayload, Clock, DisplaySettings, FixedClock,
    SeverityTier, SlaTimerStatus, TimerDisplay, TimerTicker,
};

fn load(name: &str) -> CasePayload {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    CasePayload::load(&path).unwrap()
}

fn fixture() -> CasePayload {
    load("case_1042.json")
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap()
}

fn ids<'a>(timers: impl IntoIterator<Item = &'a slatrack_lib::SlaTimer>) -> Vec<&'a str> {
    timers.into_iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn fixture_loads_including_unknown_status() {
    let case = fixture();
    assert_eq!(case.sla_timers.len(), 5);
    assert_eq!(case.sla_timers[4].status, SlaTimerStatus::Unknown);
}

#[test]
fn compact_row_shows_active_timers_most_urgent_first() {
    let case = fixture();
    assert_eq!(
        ids(case.compact_timers(noon(), 3)),
        vec!["customer-wait", "resolution"]
    );
}

#[test]
fn progress_list_surfaces_active_above_resolved() {
    let case = fixture();
    assert_eq!(
        ids(case.progress_timers(noon())),
        vec!["resolution", "customer-wait", "escalation", "first-response", "legacy"]
    );
}

#[test]
fn displays_for_every_timer() {
    let case = fixture();
    let thresholds = DisplaySettings::default().thresholds;
    let frames: Vec<TimerDisplay> = case
        .sla_timers
        .iter()
        .map(|timer| TimerDisplay::from_timer(timer, noon(), &thresholds))
        .collect();

    let resolution = &frames[0];
    assert_eq!(resolution.remaining_ms, 14_400_000);
    assert_eq!(resolution.remaining_label, "4h 0m");
    assert_eq!(resolution.tier, SeverityTier::Warning);
    assert_eq!(
        resolution.projected_breach_at,
        Some(Utc.with_ymd_and_hms(2024, 6, 3, 16, 0, 0).unwrap())
    );

    let waiting = &frames[1];
    assert_eq!(waiting.remaining_label, "20m 0s");
    assert_eq!(waiting.tier, SeverityTier::Muted);
    assert_eq!(
        waiting.projected_breach_at,
        Some(Utc.with_ymd_and_hms(2024, 6, 3, 12, 15, 0).unwrap())
    );

    let met = &frames[2];
    assert_eq!(met.tier, SeverityTier::Resolved);
    assert_eq!(met.projected_breach_label, "Unavailable");

    let escalation = &frames[3];
    assert_eq!(escalation.remaining_ms, 0);
    assert_eq!(escalation.remaining_label, "Breached");
    assert_eq!(escalation.tier, SeverityTier::Breached);
    assert!(escalation.breached);

    let legacy = &frames[4];
    assert_eq!(legacy.name, "sla-legacy");
    assert_eq!(legacy.tier, SeverityTier::Resolved);
    assert_eq!(legacy.projected_breach_at, None);
}

#[test]
fn nulls_and_odd_numbers_only_blank_their_field() {
    let case = load("case_nulls.json");
    assert_eq!(case.title, None);
    assert_eq!(ids(&case.sla_timers), vec!["overdue-hold", "resolution", "orphan"]);
    assert!(case.sla_timers.iter().all(|timer| timer.total_paused_ms == 0));

    let thresholds = DisplaySettings::default().thresholds;
    let frames: Vec<TimerDisplay> = case
        .sla_timers
        .iter()
        .map(|timer| TimerDisplay::from_timer(timer, noon(), &thresholds))
        .collect();

    let hold = &frames[0];
    assert_eq!(case.sla_timers[0].remaining_ms, Some(-90_000));
    assert!(hold.breached);
    assert_eq!(hold.remaining_ms, 0);
    assert_eq!(hold.remaining_label, "Breached");
    assert_eq!(hold.tier, SeverityTier::Muted);

    let resolution = &frames[1];
    assert_eq!(case.sla_timers[1].goal_ms(), None);
    assert_eq!(resolution.remaining_ms, 540_000);
    assert_eq!(resolution.tier, SeverityTier::Normal);
    assert_eq!(resolution.percent_remaining, 100.0);

    let orphan = &frames[2];
    assert_eq!(orphan.status, SlaTimerStatus::Unknown);
    assert_eq!(case.sla_timers[2].remaining_ms, None);
    assert_eq!(case.sla_timers[2].started_at.as_deref(), Some("1717400000"));
    assert!(!orphan.breached);
    assert_eq!(orphan.projected_breach_at, None);
}

#[test]
fn five_minutes_of_pause_moves_breach_five_minutes() {
    let case = fixture();
    let waiting = &case.sla_timers[1];
    let earlier = Utc.with_ymd_and_hms(2024, 6, 3, 10, 45, 0).unwrap();

    let first = projected_breach_at(waiting, earlier).unwrap();
    let later = projected_breach_at(waiting, earlier + Duration::minutes(5)).unwrap();
    assert_eq!(later - first, Duration::minutes(5));
    assert_eq!(format_projected_breach(Some(first)), "Jun 3, 2024 11:00 UTC");
}

#[tokio::test(start_paused = true)]
async fn tickers_only_keep_running_timers_alive() {
    let case = fixture();
    let clock = FixedClock::new(noon());
    let shared: Arc<dyn Clock> = Arc::new(clock.clone());
    let settings = DisplaySettings::default();

    let mut tickers: Vec<TimerTicker> = case
        .sla_timers
        .iter()
        .cloned()
        .map(|timer| TimerTicker::spawn(timer, shared.clone(), &settings))
        .collect();

    let running: Vec<bool> = tickers.iter().map(|t| !t.is_finished()).collect();
    assert_eq!(running, vec![true, false, false, false, false]);

    let mut frames = tickers[0].subscribe();
    clock.advance(Duration::seconds(30));
    frames.changed().await.unwrap();
    assert_eq!(frames.borrow_and_update().remaining_ms, 14_370_000);

    for ticker in &mut tickers {
        ticker.stop().await.unwrap();
    }
    assert!(tickers.iter().all(TimerTicker::is_finished));
}
