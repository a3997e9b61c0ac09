use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::log_debug;
use crate::settings::DisplaySettings;

use super::{SeverityThresholds, SlaTimer, SlaTimerStatus, TimerDisplay};

const ENABLE_LOGS: bool = true;

/// Recomputes the display of one timer on a fixed cadence.
///
/// The first frame is published on spawn. Only running timers keep ticking;
/// any other status publishes that single frame and the task ends. Dropping
/// the ticker cancels its task.
pub struct TimerTicker {
    timer: Arc<SlaTimer>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    thresholds: SeverityThresholds,
    frames: Arc<watch::Sender<TimerDisplay>>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl TimerTicker {
    /// Must be called from within a tokio runtime.
    pub fn spawn(timer: SlaTimer, clock: Arc<dyn Clock>, settings: &DisplaySettings) -> Self {
        let timer = Arc::new(timer);
        let thresholds = settings.thresholds;
        let first = TimerDisplay::from_timer(&timer, clock.now(), &thresholds);
        let (frames, _) = watch::channel(first);

        let mut ticker = Self {
            timer,
            clock,
            tick_interval: settings.tick_interval(),
            thresholds,
            frames: Arc::new(frames),
            handle: None,
            cancel_token: None,
        };
        ticker.start();
        ticker
    }

    pub fn timer(&self) -> &SlaTimer {
        &self.timer
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerDisplay> {
        self.frames.subscribe()
    }

    pub fn latest(&self) -> TimerDisplay {
        self.frames.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_finished())
    }

    /// Swap in a refetched snapshot: the old task is cancelled, a frame for
    /// the new snapshot is published and ticking restarts if it is running.
    pub async fn replace(&mut self, timer: SlaTimer) -> Result<()> {
        self.stop().await?;
        self.timer = Arc::new(timer);
        let frame = TimerDisplay::from_timer(&self.timer, self.clock.now(), &self.thresholds);
        self.frames.send_replace(frame);
        self.start();
        Ok(())
    }

    /// Wait for the task to end on its own.
    pub async fn wait(&mut self) -> Result<()> {
        self.cancel_token = None;
        join(self.handle.take()).await
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        join(self.handle.take()).await
    }

    fn start(&mut self) {
        if self.timer.status != SlaTimerStatus::Running {
            log_debug!(
                "timer {} is {}; not ticking",
                self.timer.id,
                self.timer.status
            );
            return;
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(tick_loop(
            self.timer.clone(),
            self.clock.clone(),
            self.tick_interval,
            self.thresholds,
            self.frames.clone(),
            cancel_token.clone(),
        ));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }
}

impl Drop for TimerTicker {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}

async fn join(handle: Option<JoinHandle<()>>) -> Result<()> {
    match handle {
        Some(handle) => handle.await.context("timer ticker task failed to join"),
        None => Ok(()),
    }
}

async fn tick_loop(
    timer: Arc<SlaTimer>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    thresholds: SeverityThresholds,
    frames: Arc<watch::Sender<TimerDisplay>>,
    cancel_token: CancellationToken,
) {
    let mut interval = time::interval(tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the immediate first tick; the spawn frame already covers it
    interval.tick().await;

    log_debug!("ticker started for timer {}", timer.id);
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => break,
            _ = interval.tick() => {}
        }

        let frame = TimerDisplay::from_timer(&timer, clock.now(), &thresholds);
        frames.send_replace(frame);
    }
    log_debug!("ticker stopped for timer {}", timer.id);
}
