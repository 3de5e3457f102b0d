//! Per-question countdown: display formatting and tick scheduling.
//!
//! The controller never sleeps. It asks a [`TickScheduler`] to deliver
//! `Action::Tick(id)` once per second and cancels it when a question phase
//! ends. Every start gets a fresh [`TimerId`] so a tick that was already in
//! flight when its loop was cancelled is recognisably stale.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controller::Action;

/// Identifier of one started tick loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Format remaining seconds as zero-padded `MM:SS`.
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whether the countdown should be shown with urgent styling.
pub fn is_urgent(secs: u32, threshold: u32) -> bool {
    secs <= threshold
}

/// Delivers a repeating tick for one timer at a time.
pub trait TickScheduler: Send {
    /// Start ticking for `id`, replacing any running loop.
    fn start(&mut self, id: TimerId);

    /// Stop the running loop, if any. A tick already in flight may still be
    /// delivered after this returns; consumers discard it by comparing its
    /// [`TimerId`] against the timer they consider active.
    fn cancel(&mut self);
}

// ---------------------------------------------------------------------------
// Tokio scheduler
// ---------------------------------------------------------------------------

/// Ticks on the tokio runtime by sending `Action::Tick` into a channel.
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<Action>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            tx,
            period: Duration::from_secs(1),
            task: None,
        }
    }

    /// Override the tick period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl TickScheduler for TokioTicker {
    fn start(&mut self, id: TimerId) {
        self.cancel();
        let tx = self.tx.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if tx.send(Action::Tick(id)).is_err() {
                    break;
                }
            }
        }));
        tracing::trace!(%id, "tick loop started");
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!("tick loop cancelled");
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Manual scheduler
// ---------------------------------------------------------------------------

/// What a [`ManualTicker`] has been asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualTickerState {
    /// The currently running timer, if any.
    pub active: Option<TimerId>,
    /// Number of `start` calls.
    pub starts: u32,
    /// Number of `cancel` calls that stopped a running timer.
    pub cancels: u32,
}

/// A scheduler that never ticks on its own. Callers dispatch
/// `Action::Tick` themselves, which makes the controller fully
/// deterministic for headless runs and tests.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<ManualTickerState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded calls.
    pub fn state(&self) -> ManualTickerState {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The running timer, if any.
    pub fn active(&self) -> Option<TimerId> {
        self.state().active
    }
}

impl TickScheduler for ManualTicker {
    fn start(&mut self, id: TimerId) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.active = Some(id);
        state.starts += 1;
    }

    fn cancel(&mut self) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.active.take().is_some() {
            state.cancels += 1;
        }
    }
}
