//! Daemon control: on-demand check requests and shutdown, plus the control socket path.
//!
//! A `MonitorControl` is shared by everything that can trigger the daemon
//! (signal listener, control socket, tests). The scheduler's event source
//! waits on it.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Shared handle for requesting checks and shutdown.
#[derive(Clone)]
pub struct MonitorControl {
    check: Arc<Notify>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl Default for MonitorControl {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorControl {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            check: Arc::new(Notify::new()),
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    /// Request a check. Requests made while a cycle runs collapse into one
    /// pending request that is served after the cycle.
    pub fn request_check(&self) {
        self.check.notify_one();
    }

    /// Request shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    pub(crate) fn check_notify(&self) -> Arc<Notify> {
        Arc::clone(&self.check)
    }

    pub(crate) fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }
}

/// Default path for the control socket (XDG state dir, next to the log).
pub fn default_control_socket_path() -> std::io::Result<PathBuf> {
    let dir = xdg::BaseDirectories::with_prefix("icheck")?.get_state_home();
    Ok(dir.join("icheck").join("control.sock"))
}
