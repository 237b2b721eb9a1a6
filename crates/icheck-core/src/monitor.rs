//! One watched directory: the baseline taken at startup and a check cycle against it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::checksum::Crc32Table;
use crate::config::Settings;
use crate::snapshot::{self, Snapshot};
use crate::validate::{self, Report};

/// Owns the immutable baseline for the process lifetime.
#[derive(Debug)]
pub struct Monitor {
    directory: PathBuf,
    table: Arc<Crc32Table>,
    read_buffer_bytes: usize,
    baseline: Snapshot,
}

impl Monitor {
    /// Take the baseline snapshot. Fails if the directory cannot be listed.
    pub fn init(settings: &Settings, table: Arc<Crc32Table>) -> Result<Self> {
        let baseline = snapshot::take_snapshot_with_buffer(
            &table,
            &settings.directory,
            settings.read_buffer_bytes,
        )
        .context("take baseline snapshot")?;
        tracing::info!(
            dir = %settings.directory.display(),
            entries = baseline.len(),
            "baseline taken"
        );
        for (path, state) in baseline.failing() {
            tracing::warn!("baseline entry {} is {}", path.display(), state);
        }
        Ok(Self {
            directory: settings.directory.clone(),
            table,
            read_buffer_bytes: settings.read_buffer_bytes,
            baseline,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Run one cycle: scan the directory again and validate it against the baseline.
    pub fn check(&self) -> Result<Report> {
        let current = snapshot::take_snapshot_with_buffer(
            &self.table,
            &self.directory,
            self.read_buffer_bytes,
        )?;
        Ok(validate::validate(&self.baseline, &current))
    }
}

/// Write the verdict of one cycle: an error line per failing path, or a single OK line.
pub fn emit(report: &Report) {
    for path in &report.appeared {
        tracing::debug!(target: "icheck::verdict", "new file not in baseline: {}", path.display());
    }
    if report.is_pass() {
        tracing::info!(target: "icheck::verdict", "Integrity check: OK");
        return;
    }
    for diagnostic in &report.diagnostics {
        tracing::error!(target: "icheck::verdict", "Integrity check: FAIL ({})", diagnostic);
    }
}
