//! icheck core: checksum snapshots of one directory, diffed against a baseline
//! on a schedule and on demand.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod control;
pub mod monitor;
pub mod probe;
pub mod scheduler;
#[cfg(unix)]
pub mod signals;
pub mod snapshot;
pub mod trigger;
pub mod validate;
