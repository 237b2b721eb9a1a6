use clap::Parser;
use icheck_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_stderr {
        logging::init_logging_stderr();
    } else if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = cli.command.run().await {
        tracing::error!("{:#}", err);
        eprintln!("integrity-checker error: {:#}", err);
        std::process::exit(1);
    }
}
