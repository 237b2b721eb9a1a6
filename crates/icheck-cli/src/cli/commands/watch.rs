//! `integrity-checker watch` – take the baseline and run the check scheduler.

use anyhow::{bail, Context, Result};
use icheck_core::checksum;
use icheck_core::config::{self, Settings};
use icheck_core::control::MonitorControl;
use icheck_core::scheduler::Scheduler;
use icheck_core::signals;
use icheck_core::trigger::TimedEvents;
use std::sync::Arc;

use crate::cli::control_socket;
use crate::cli::WatchArgs;

pub async fn run_watch(args: WatchArgs) -> Result<()> {
    let file_cfg = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_default()?,
    };
    let settings = Settings::resolve(file_cfg, args.directory.clone(), args.time_interval)?;
    tracing::debug!("resolved settings: {:?}", settings);

    let control = MonitorControl::new();
    // Install handlers before the baseline so an early SIGTERM is handled, not fatal.
    let signal_task = signals::spawn_signal_listener(control.clone())?;

    // Held until return; dropping it removes the socket on every exit path.
    let _listener = if args.no_control_socket {
        None
    } else {
        match args.socket.resolve() {
            Ok(path) => {
                if control_socket::socket_in_use(&path) {
                    bail!(
                        "another integrity-checker is already running (control socket {})",
                        path.display()
                    );
                }
                match control_socket::spawn_control_listener(control.clone(), &path) {
                    Ok(listener) => {
                        tracing::debug!(path = %listener.path().display(), "control socket listening");
                        Some(listener)
                    }
                    Err(e) => {
                        tracing::warn!("control socket unavailable: {:#}", e);
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!("control socket unavailable: {:#}", e);
                None
            }
        }
    };

    let table = Arc::new(checksum::generate_table());
    let start_settings = settings.clone();
    let mut scheduler =
        tokio::task::spawn_blocking(move || Scheduler::start(&start_settings, table))
            .await
            .context("baseline task")??;

    let mut events = TimedEvents::new(settings.interval, &control);
    let summary = scheduler.run(&mut events).await?;
    tracing::debug!(?summary, "scheduler finished");

    signal_task.abort();
    Ok(())
}
