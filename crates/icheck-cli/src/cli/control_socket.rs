//! Control socket: server (during `watch`) and client (for `check-now` / `stop`).
//! Protocol: one command per line: "check" or "stop".

use anyhow::{bail, Context, Result};
use icheck_core::control::MonitorControl;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Check,
    Stop,
}

impl ControlCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlCommand::Check => "check",
            ControlCommand::Stop => "stop",
        }
    }
}

/// Parse one protocol line. Unknown lines yield None.
pub fn parse_command(line: &str) -> Option<ControlCommand> {
    match line.trim() {
        "check" => Some(ControlCommand::Check),
        "stop" => Some(ControlCommand::Stop),
        _ => None,
    }
}

/// True if a daemon is accepting connections on `path`.
pub fn socket_in_use(path: &Path) -> bool {
    std::os::unix::net::UnixStream::connect(path).is_ok()
}

/// Running control socket server. Dropping it stops the accept loop and
/// removes the socket file.
pub struct ControlListener {
    path: PathBuf,
    handle: tokio::task::JoinHandle<()>,
}

impl ControlListener {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ControlListener {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Binds `path` and spawns a task that forwards "check" / "stop" lines to `control`.
/// Ignores malformed lines. A stale socket file at `path` is replaced; a live
/// one (another daemon answering) is an error.
pub fn spawn_control_listener(
    control: MonitorControl,
    path: impl AsRef<Path>,
) -> Result<ControlListener> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    if socket_in_use(&path) {
        bail!("another daemon is listening on {}", path.display());
    }
    let _ = std::fs::remove_file(&path);
    let listener =
        UnixListener::bind(&path).with_context(|| format!("bind {}", path.display()))?;

    let handle = tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _)) => {
                    let control = control.clone();
                    tokio::spawn(async move {
                        let mut reader = BufReader::new(stream).lines();
                        while let Ok(Some(line)) = reader.next_line().await {
                            match parse_command(&line) {
                                Some(ControlCommand::Check) => control.request_check(),
                                Some(ControlCommand::Stop) => control.shutdown(),
                                None => tracing::debug!("control socket: ignoring {:?}", line),
                            }
                        }
                    });
                }
                Err(e) => tracing::debug!("control socket accept: {}", e),
            }
        }
    });
    Ok(ControlListener { path, handle })
}

/// Sends one command to the control socket of a running daemon.
pub async fn send_command(socket_path: &Path, command: ControlCommand) -> Result<()> {
    if !socket_path.exists() {
        bail!("no running daemon: {} does not exist", socket_path.display());
    }
    let mut stream = UnixStream::connect(socket_path)
        .await
        .with_context(|| format!("connect {}", socket_path.display()))?;
    let msg = format!("{}\n", command.as_str());
    stream.write_all(msg.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
