//! Check scheduler.
//!
//! Owns the monitor (and therefore the baseline) and runs check cycles one at a
//! time, whenever the event source yields a tick or an on-demand request, until
//! it yields shutdown. Cycles run on the blocking pool so file I/O never stalls
//! the runtime; the scheduler awaits each one before looking at the next event.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::checksum::Crc32Table;
use crate::config::Settings;
use crate::monitor::{self, Monitor};
use crate::trigger::{EventSource, Trigger};
use crate::validate::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Initializing,
    Running,
    Terminated,
}

/// Counters for one `run` of the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub passed: u64,
    pub failed: u64,
    /// Cycles in which the directory itself could not be scanned.
    pub scan_errors: u64,
}

pub struct Scheduler {
    monitor: Arc<Monitor>,
    state: SchedulerState,
}

impl Scheduler {
    /// Initialize: take the baseline. Any error here is fatal to the daemon.
    pub fn start(settings: &Settings, table: Arc<Crc32Table>) -> Result<Self> {
        tracing::debug!(state = ?SchedulerState::Initializing, "scheduler starting");
        let monitor = Monitor::init(settings, table)?;
        Ok(Self::new(monitor))
    }

    /// Wrap an already initialized monitor.
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor: Arc::new(monitor),
            state: SchedulerState::Running,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Serve events until shutdown. Returns once no further cycle will run.
    pub async fn run<E: EventSource>(&mut self, events: &mut E) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        if self.state == SchedulerState::Terminated {
            return Ok(summary);
        }
        tracing::info!(dir = %self.monitor.directory().display(), "integrity monitor running");

        loop {
            let trigger = events.next_event().await;
            match trigger {
                Trigger::Shutdown => break,
                Trigger::Tick | Trigger::OnDemand => {
                    tracing::debug!(?trigger, "starting check cycle");
                    summary.cycles += 1;
                    match self.run_cycle().await {
                        Ok(report) => {
                            monitor::emit(&report);
                            if report.is_pass() {
                                summary.passed += 1;
                            } else {
                                summary.failed += 1;
                            }
                        }
                        Err(e) => {
                            summary.scan_errors += 1;
                            tracing::error!(
                                target: "icheck::verdict",
                                "Integrity check: FAIL (cannot scan {}: {:#})",
                                self.monitor.directory().display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        self.state = SchedulerState::Terminated;
        tracing::info!(
            cycles = summary.cycles,
            failed = summary.failed,
            "integrity monitor stopped"
        );
        Ok(summary)
    }

    async fn run_cycle(&self) -> Result<Report> {
        let monitor = Arc::clone(&self.monitor);
        tokio::task::spawn_blocking(move || monitor.check())
            .await
            .context("check cycle task")?
    }
}
