//! Live ticker
//!
//! Owned timer resource behind the live simulation. One background task
//! per running ticker; stopping (or dropping) the ticker aborts it, so no
//! tick can be emitted after the simulation is switched off.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default period between ticks
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

const TICK_CHANNEL_CAPACITY: usize = 16;

/// One periodic notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tick {
    /// 1-based counter since the ticker was last started
    pub sequence: u64,
    /// Wall-clock time the tick fired
    pub at: DateTime<Utc>,
}

/// Periodic tick source with an explicit start/stop lifecycle
pub struct LiveTicker {
    period: Duration,
    sender: broadcast::Sender<Tick>,
    task: Option<JoinHandle<()>>,
    last_tick: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl LiveTicker {
    pub fn new(period: Duration) -> Self {
        let (sender, _) = broadcast::channel(TICK_CHANNEL_CAPACITY);
        Self {
            period,
            sender,
            task: None,
            last_tick: Arc::new(RwLock::new(None)),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Subscribe to ticks
    ///
    /// Subscribe before calling [`start`](Self::start) to observe the first tick.
    pub fn subscribe(&self) -> broadcast::Receiver<Tick> {
        self.sender.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Timestamp of the most recent tick, if any
    pub async fn last_tick(&self) -> Option<DateTime<Utc>> {
        *self.last_tick.read().await
    }

    /// Start emitting ticks, the first one a full period from now
    ///
    /// Returns false if the ticker was already running. Must be called
    /// within a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let period = self.period;
        let sender = self.sender.clone();
        let last_tick = Arc::clone(&self.last_tick);

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0u64;

            loop {
                interval.tick().await;
                sequence += 1;

                let at = Utc::now();
                *last_tick.write().await = Some(at);

                // No subscribers is fine; the tick is simply dropped
                let receivers = sender.send(Tick { sequence, at }).unwrap_or(0);
                tracing::trace!(sequence, receivers, "Tick");
            }
        }));

        tracing::debug!(period_ms = period.as_millis() as u64, "Live ticker started");
        true
    }

    /// Stop emitting ticks
    ///
    /// Returns false if the ticker was not running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                tracing::debug!("Live ticker stopped");
                true
            }
            None => false,
        }
    }
}

impl Drop for LiveTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
