//! Compares a current scan with the baseline and classifies every path.

mod verdict;

use std::cmp::Ordering;

use crate::probe::FileState;
use crate::snapshot::Snapshot;

pub use verdict::{Diagnostic, Report, Verdict};

/// Classify a path present in both scans.
///
/// A file that was already abnormal in the baseline is only reported when its
/// state changes; repeating the same abnormal state is not a new failure.
pub fn classify(old: FileState, new: FileState) -> Verdict {
    match (old, new) {
        (FileState::Ok(a), FileState::Ok(b)) if a == b => Verdict::Unchanged,
        (FileState::Ok(a), FileState::Ok(b)) => Verdict::ChecksumMismatch { old: a, new: b },
        (old, new) if old == new => Verdict::Unchanged,
        (old, new) => Verdict::StateChanged { old, new },
    }
}

/// Merge both snapshots in ascending path order and collect every failure.
///
/// Runs in O(n) over the combined size; both inputs are already sorted.
pub fn validate(baseline: &Snapshot, current: &Snapshot) -> Report {
    let mut report = Report::default();
    let mut old_it = baseline.iter().peekable();
    let mut new_it = current.iter().peekable();

    loop {
        let order = match (old_it.peek(), new_it.peek()) {
            (Some((old_path, _)), Some((new_path, _))) => old_path.cmp(new_path),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };

        match order {
            Ordering::Equal => {
                let (Some((path, old)), Some((_, new))) = (old_it.next(), new_it.next()) else {
                    break;
                };
                report.compared += 1;
                let verdict = classify(*old, *new);
                if verdict.is_failure() {
                    report.diagnostics.push(Diagnostic {
                        path: path.clone(),
                        verdict,
                    });
                }
            }
            Ordering::Less => {
                let Some((path, _)) = old_it.next() else { break };
                report.diagnostics.push(Diagnostic {
                    path: path.clone(),
                    verdict: Verdict::Disappeared,
                });
            }
            Ordering::Greater => {
                let Some((path, _)) = new_it.next() else { break };
                report.appeared.push(path.clone());
            }
        }
    }

    report
}
