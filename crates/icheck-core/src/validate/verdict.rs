//! Per-path verdicts and the report produced by one validation pass.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::probe::FileState;

/// Outcome of comparing one baseline entry with the current scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Unchanged,
    /// Both scans read the file but the content checksum changed.
    ChecksumMismatch { old: u32, new: u32 },
    /// The file state changed (e.g. became unreadable, or recovered).
    StateChanged { old: FileState, new: FileState },
    /// Present in the baseline, absent from the current scan.
    Disappeared,
    /// Present only in the current scan. Not a failure.
    Appeared,
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Verdict::ChecksumMismatch { .. } | Verdict::StateChanged { .. } | Verdict::Disappeared
        )
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Unchanged => write!(f, "unchanged"),
            Verdict::ChecksumMismatch { old, new } => {
                write!(f, "check sums differ: <{:x}, {:x}>", old, new)
            }
            Verdict::StateChanged { new, .. } => write!(f, "file is {}", new),
            Verdict::Disappeared => write!(f, "file is {}", FileState::NotFound),
            Verdict::Appeared => write!(f, "new file"),
        }
    }
}

/// One failing path; renders as `<path> - <reason>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub verdict: Verdict,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.path.display(), self.verdict)
    }
}

/// Result of validating a scan against the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Failing paths in ascending path order.
    pub diagnostics: Vec<Diagnostic>,
    /// Paths seen only in the current scan.
    pub appeared: Vec<PathBuf>,
    /// Number of paths present in both scans.
    pub compared: usize,
}

impl Report {
    pub fn is_pass(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostic_for(&self, path: &Path) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.path == path)
    }
}
