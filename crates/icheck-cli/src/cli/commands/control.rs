//! `integrity-checker check-now` / `stop` – talk to a running daemon over its control socket.

use anyhow::Result;
use std::path::Path;

use crate::cli::control_socket::{self, ControlCommand};

pub async fn run_check_now(socket_path: &Path) -> Result<()> {
    control_socket::send_command(socket_path, ControlCommand::Check).await?;
    println!("Check requested");
    Ok(())
}

pub async fn run_stop(socket_path: &Path) -> Result<()> {
    control_socket::send_command(socket_path, ControlCommand::Stop).await?;
    println!("Shutdown requested");
    Ok(())
}
