//! Periodic cycle driver.
//!
//! # States
//! ```text
//! Idle ──start()──▶ Running ──stop()──▶ Stopped
//!   └──────────────stop()──────────────────┘
//! ```
//!
//! # Design Decisions
//! - Fixed rate: cycles start every `interval`; an overrunning cycle is
//!   followed immediately by the next one, never by a burst of catch-up cycles
//! - The loop owns the aggregator, so cycles cannot overlap
//! - `stop()` does not interrupt an in-flight cycle, but that cycle's merge
//!   is discarded and no later cycle starts

use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::aggregator::engine::Aggregator;
use crate::aggregator::snapshot::SnapshotStore;
use crate::health::probe::{HttpProber, Prober};

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("scheduler cannot start from state {0:?}")]
    InvalidTransition(SchedulerState),

    #[error("interval must be greater than zero")]
    ZeroInterval,
}

/// Drives `Aggregator::run_cycle` on a timer.
pub struct Scheduler<P: Prober = HttpProber> {
    state: SchedulerState,
    aggregator: Option<Aggregator<P>>,
    store: SnapshotStore,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<Aggregator<P>>>,
}

impl<P: Prober> Scheduler<P> {
    pub fn new(aggregator: Aggregator<P>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            state: SchedulerState::Idle,
            store: aggregator.store(),
            aggregator: Some(aggregator),
            stop_tx,
            task: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Begin cycling: one cycle now, then one every `interval`.
    pub fn start(&mut self, interval: Duration) -> Result<(), SchedulerError> {
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }
        let aggregator = match (self.state, self.aggregator.take()) {
            (SchedulerState::Idle, Some(aggregator)) => aggregator,
            (state, aggregator) => {
                self.aggregator = aggregator;
                return Err(SchedulerError::InvalidTransition(state));
            }
        };

        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            services = aggregator.service_count(),
            "Scheduler starting"
        );

        let stop_rx = self.stop_tx.subscribe();
        self.task = Some(tokio::spawn(run_loop(aggregator, interval, stop_rx)));
        self.state = SchedulerState::Running;
        Ok(())
    }

    /// Request that no further cycle starts. Idempotent.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.store.halt();
        self.stop_tx.send_replace(true);
        self.state = SchedulerState::Stopped;
        tracing::info!("Scheduler stopped");
    }

    /// Stop and wait for the loop (and any in-flight cycle) to finish,
    /// handing the aggregator back.
    pub async fn shutdown(mut self) -> Option<Aggregator<P>> {
        self.stop();
        match self.task.take() {
            Some(task) => match task.await {
                Ok(aggregator) => Some(aggregator),
                Err(e) => {
                    tracing::error!(error = %e, "Scheduler task failed");
                    None
                }
            },
            None => self.aggregator.take(),
        }
    }
}

impl<P: Prober> Drop for Scheduler<P> {
    fn drop(&mut self) {
        self.store.halt();
        self.stop_tx.send_replace(true);
    }
}

async fn run_loop<P: Prober>(
    mut aggregator: Aggregator<P>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) -> Aggregator<P> {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            _ = ticker.tick() => {}
        }
        let stopped = *stop_rx.borrow();
        if stopped {
            break;
        }
        aggregator.run_cycle().await;
    }

    tracing::debug!("Scheduler loop exited");
    aggregator
}
