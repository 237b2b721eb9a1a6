//! Snapshot command: print the CRC-32 (or state) of every direct entry of a directory.

use anyhow::Result;
use icheck_core::checksum;
use icheck_core::probe::FileState;
use icheck_core::snapshot;
use std::path::Path;

pub async fn run_snapshot(dir: &Path) -> Result<()> {
    let table = checksum::generate_table();
    let snap = snapshot::take_snapshot(&table, dir)?;
    for (path, state) in &snap {
        match state {
            FileState::Ok(sum) => println!("{:08x}  {}", sum, path.display()),
            other => println!("{}  {}", other, path.display()),
        }
    }
    Ok(())
}
