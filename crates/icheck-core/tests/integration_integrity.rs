//! End-to-end checks: baseline, modify the watched directory, run cycles.

mod common;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::watched_dir::WatchedDir;
use icheck_core::checksum::generate_table;
use icheck_core::control::MonitorControl;
use icheck_core::monitor::Monitor;
use icheck_core::scheduler::{Scheduler, SchedulerState};
use icheck_core::snapshot::FileState;
use icheck_core::trigger::{EventSource, TimedEvents, Trigger};
use icheck_core::validate::Verdict;

struct Scripted(VecDeque<Trigger>);

impl EventSource for Scripted {
    async fn next_event(&mut self) -> Trigger {
        self.0.pop_front().unwrap_or(Trigger::Shutdown)
    }
}

#[test]
fn modified_file_reports_one_mismatch() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello"), ("b.txt", b"world")]);
    let monitor = Monitor::init(&dir.settings(60), Arc::new(generate_table())).unwrap();

    dir.write("b.txt", b"earth");
    let report = monitor.check().unwrap();

    assert!(!report.is_pass());
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].path, dir.path("b.txt"));
    assert!(matches!(
        report.diagnostics[0].verdict,
        Verdict::ChecksumMismatch { .. }
    ));
    assert!(report.diagnostic_for(&dir.path("a.txt")).is_none());
    let line = report.diagnostics[0].to_string();
    assert!(line.ends_with(&format!(
        "b.txt - check sums differ: <{:x}, {:x}>",
        crc32fast::hash(b"world"),
        crc32fast::hash(b"earth")
    )));
}

#[test]
fn deleted_file_reports_not_found() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello")]);
    let monitor = Monitor::init(&dir.settings(60), Arc::new(generate_table())).unwrap();

    dir.remove("a.txt");
    let report = monitor.check().unwrap();

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].verdict, Verdict::Disappeared);
    assert!(report.diagnostics[0]
        .to_string()
        .ends_with("a.txt - file is NOT_FOUND"));
}

#[test]
fn unchanged_directory_passes() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello"), ("b.txt", b"world")]);
    let monitor = Monitor::init(&dir.settings(60), Arc::new(generate_table())).unwrap();
    let report = monitor.check().unwrap();
    assert!(report.is_pass());
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.compared, 2);
}

#[test]
fn new_file_is_not_a_failure() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello")]);
    let monitor = Monitor::init(&dir.settings(60), Arc::new(generate_table())).unwrap();
    dir.write("c.txt", b"fresh");
    let report = monitor.check().unwrap();
    assert!(report.is_pass());
    assert_eq!(report.appeared, vec![dir.path("c.txt")]);
}

#[cfg(unix)]
#[test]
fn unreadable_file_reports_not_accessible() {
    use std::os::unix::fs::PermissionsExt;

    let dir = WatchedDir::with_files(&[("a.txt", b"hello")]);
    let monitor = Monitor::init(&dir.settings(60), Arc::new(generate_table())).unwrap();

    std::fs::set_permissions(dir.path("a.txt"), std::fs::Permissions::from_mode(0o000)).unwrap();
    // Root ignores file modes; nothing to observe in that case.
    if std::fs::File::open(dir.path("a.txt")).is_ok() {
        return;
    }
    let report = monitor.check().unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0]
        .to_string()
        .ends_with("a.txt - file is NOT_ACCESSIBLE"));
}

#[cfg(unix)]
#[tokio::test]
async fn fifo_entry_does_not_stall_cycles_or_shutdown() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello")]);
    dir.make_fifo("in-baseline.pipe");
    let mut scheduler = Scheduler::start(&dir.settings(3600), Arc::new(generate_table())).unwrap();
    assert_eq!(
        scheduler.monitor().baseline().get(&dir.path("in-baseline.pipe")),
        Some(&FileState::UndefinedError)
    );

    dir.make_fifo("late.pipe");
    let control = MonitorControl::new();
    let mut events = TimedEvents::new(Duration::from_secs(3600), &control);
    control.request_check();
    let stopper = control.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        stopper.shutdown();
    });

    let summary = tokio::time::timeout(Duration::from_secs(5), scheduler.run(&mut events))
        .await
        .expect("scheduler should stop")
        .unwrap();
    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.passed, 1);
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
}

#[tokio::test]
async fn scheduler_serves_scripted_events() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello")]);
    let mut scheduler = Scheduler::start(&dir.settings(60), Arc::new(generate_table())).unwrap();
    let mut events = Scripted(VecDeque::from([Trigger::OnDemand, Trigger::Tick]));
    let summary = scheduler.run(&mut events).await.unwrap();
    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.passed, 2);
}

#[tokio::test]
async fn shutdown_while_idle_exits_promptly() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello")]);
    let mut scheduler = Scheduler::start(&dir.settings(3600), Arc::new(generate_table())).unwrap();
    let control = MonitorControl::new();
    let mut events = TimedEvents::new(Duration::from_secs(3600), &control);

    let stopper = control.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        stopper.shutdown();
    });

    let started = Instant::now();
    let summary = tokio::time::timeout(Duration::from_secs(5), scheduler.run(&mut events))
        .await
        .expect("scheduler should stop within the bound")
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.cycles, 0);
    assert_eq!(scheduler.state(), SchedulerState::Terminated);
}

#[tokio::test]
async fn on_demand_request_runs_cycle_then_shutdown() {
    let dir = WatchedDir::with_files(&[("a.txt", b"hello"), ("b.txt", b"world")]);
    let mut scheduler = Scheduler::start(&dir.settings(3600), Arc::new(generate_table())).unwrap();
    let control = MonitorControl::new();
    let mut events = TimedEvents::new(Duration::from_secs(3600), &control);

    dir.write("b.txt", b"earth");
    control.request_check();
    let stopper = control.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        stopper.shutdown();
    });

    let summary = tokio::time::timeout(Duration::from_secs(5), scheduler.run(&mut events))
        .await
        .expect("scheduler should stop")
        .unwrap();
    assert_eq!(summary.cycles, 1);
    assert_eq!(summary.failed, 1);
}
