//! Events that drive the scheduler: interval ticks, on-demand checks, shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::control::MonitorControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The check interval elapsed.
    Tick,
    /// Someone asked for a check now (signal, control socket).
    OnDemand,
    /// Stop monitoring; no further cycles.
    Shutdown,
}

/// Source of scheduler events. `next_event` waits until one is available.
pub trait EventSource {
    fn next_event(&mut self) -> impl Future<Output = Trigger> + Send;
}

/// Production event source: a fixed interval plus the requests arriving
/// through a `MonitorControl`.
///
/// Shutdown wins over everything else; on-demand requests win over ticks.
pub struct TimedEvents {
    interval: Interval,
    check: Arc<Notify>,
    shutdown_rx: watch::Receiver<bool>,
}

impl TimedEvents {
    /// The first tick fires one full `period` after creation.
    pub fn new(period: Duration, control: &MonitorControl) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        // Ticks missed while a cycle runs collapse into one.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval,
            check: control.check_notify(),
            shutdown_rx: control.subscribe_shutdown(),
        }
    }
}

async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Every control handle is gone: shutdown can no longer be requested.
            std::future::pending::<()>().await;
        }
    }
}

impl EventSource for TimedEvents {
    async fn next_event(&mut self) -> Trigger {
        tokio::select! {
            biased;
            _ = shutdown_requested(&mut self.shutdown_rx) => Trigger::Shutdown,
            _ = self.check.notified() => Trigger::OnDemand,
            _ = self.interval.tick() => Trigger::Tick,
        }
    }
}
