//! Unix signal bridge.
//!
//! `SIGUSR1` requests a check, `SIGTERM` shuts the daemon down. `SIGINT`,
//! `SIGQUIT` and `SIGHUP` are caught and ignored so they cannot kill the
//! daemon with their default action.

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, Signal, SignalKind};

use crate::control::MonitorControl;

fn register(kind: SignalKind, name: &str) -> Result<Signal> {
    signal(kind).with_context(|| format!("register {} handler", name))
}

/// Install all handlers, then forward signals to `control` from a spawned task.
///
/// Registration happens before this returns, so a failure is reported to the
/// caller (fatal at startup) rather than inside the task.
pub fn spawn_signal_listener(control: MonitorControl) -> Result<tokio::task::JoinHandle<()>> {
    let mut usr1 = register(SignalKind::user_defined1(), "SIGUSR1")?;
    let mut term = register(SignalKind::terminate(), "SIGTERM")?;
    let mut int = register(SignalKind::interrupt(), "SIGINT")?;
    let mut quit = register(SignalKind::quit(), "SIGQUIT")?;
    let mut hup = register(SignalKind::hangup(), "SIGHUP")?;

    let handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = term.recv() => {
                    tracing::info!("SIGTERM received, shutting down");
                    control.shutdown();
                    return;
                }
                Some(()) = usr1.recv() => {
                    tracing::debug!("SIGUSR1 received, requesting check");
                    control.request_check();
                }
                Some(()) = int.recv() => tracing::debug!("ignoring SIGINT"),
                Some(()) = quit.recv() => tracing::debug!("ignoring SIGQUIT"),
                Some(()) = hup.recv() => tracing::debug!("ignoring SIGHUP"),
                else => return,
            }
        }
    });
    Ok(handle)
}
