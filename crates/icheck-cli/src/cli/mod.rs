//! CLI for the icheck integrity monitor.

mod commands;
mod control_socket;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_check_now, run_snapshot, run_stop, run_watch};

/// Top-level CLI for the icheck integrity monitor.
#[derive(Debug, Parser)]
#[command(name = "integrity-checker")]
#[command(about = "Watch a directory and report files whose content or state changed", long_about = None)]
pub struct Cli {
    /// Log to stderr instead of the state-dir log file.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options for the monitoring daemon.
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Directory whose direct entries are checked.
    #[arg(long, env = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Seconds between scheduled checks (must be > 0).
    #[arg(long, env = "time_interval", value_name = "SECS")]
    pub time_interval: Option<u64>,

    /// Config file (default: ~/.config/icheck/config.toml if present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub socket: SocketArgs,

    /// Do not listen on a control socket; only signals can trigger checks.
    #[arg(long)]
    pub no_control_socket: bool,
}

#[derive(Debug, Args)]
pub struct SocketArgs {
    /// Control socket path (default: ~/.local/state/icheck/control.sock).
    #[arg(long, value_name = "PATH")]
    pub control_socket: Option<PathBuf>,
}

impl SocketArgs {
    pub fn resolve(&self) -> Result<PathBuf> {
        match &self.control_socket {
            Some(p) => Ok(p.clone()),
            None => Ok(icheck_core::control::default_control_socket_path()?),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Take a baseline and run integrity checks until SIGTERM or `stop`.
    Watch(WatchArgs),

    /// Ask a running daemon to check now.
    CheckNow(SocketArgs),

    /// Ask a running daemon to shut down.
    Stop(SocketArgs),

    /// Print the checksum or state of every direct entry of a directory.
    Snapshot {
        /// Directory to scan.
        dir: PathBuf,
    },
}

impl CliCommand {
    pub async fn run(self) -> Result<()> {
        match self {
            CliCommand::Watch(args) => run_watch(args).await?,
            CliCommand::CheckNow(socket) => run_check_now(&socket.resolve()?).await?,
            CliCommand::Stop(socket) => run_stop(&socket.resolve()?).await?,
            CliCommand::Snapshot { dir } => run_snapshot(&dir).await?,
        }
        Ok(())
    }
}
