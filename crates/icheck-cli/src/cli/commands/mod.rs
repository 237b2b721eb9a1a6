//! CLI command handlers. Each command is in its own file.

mod control;
mod snapshot;
mod watch;

pub use control::{run_check_now, run_stop};
pub use snapshot::run_snapshot;
pub use watch::run_watch;
