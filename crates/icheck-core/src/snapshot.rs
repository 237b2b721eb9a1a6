//! Directory snapshots: path → file state for every direct entry of one directory.

use anyhow::{Context, Result};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::Crc32Table;
use crate::probe::{self, DEFAULT_BUF_SIZE};
pub use crate::probe::FileState;

/// Ordered record of a directory's direct entries at one point in time.
///
/// Iteration is in ascending path order; the diff validator relies on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, FileState>,
}

impl Snapshot {
    /// Build a snapshot from arbitrary entries (tools and tests).
    pub fn from_entries<I, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, FileState)>,
        P: Into<PathBuf>,
    {
        Self {
            entries: entries.into_iter().map(|(p, s)| (p.into(), s)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&FileState> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PathBuf, FileState> {
        self.entries.iter()
    }

    /// Entries whose state is not `Ok`.
    pub fn failing(&self) -> impl Iterator<Item = (&PathBuf, &FileState)> {
        self.entries.iter().filter(|(_, s)| !s.is_ok())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a PathBuf, &'a FileState);
    type IntoIter = btree_map::Iter<'a, PathBuf, FileState>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Snapshot `dir` with the default read buffer.
pub fn take_snapshot(table: &Crc32Table, dir: &Path) -> Result<Snapshot> {
    take_snapshot_with_buffer(table, dir, DEFAULT_BUF_SIZE)
}

/// Probe every direct entry of `dir` (non-recursive).
///
/// A file that cannot be read is recorded with its state; only failure to list
/// the directory itself is an error.
pub fn take_snapshot_with_buffer(
    table: &Crc32Table,
    dir: &Path,
    buf_size: usize,
) -> Result<Snapshot> {
    let read_dir = fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    let mut entries = BTreeMap::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        let state = probe::probe_with_buffer(table, &path, buf_size);
        entries.insert(path, state);
    }
    tracing::debug!(dir = %dir.display(), entries = entries.len(), "snapshot taken");
    Ok(Snapshot { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::generate_table;

    #[test]
    fn snapshot_lists_direct_entries_sorted() {
        let table = generate_table();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), b"world").unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("nested.txt"), b"deep").unwrap();

        let snap = take_snapshot(&table, dir.path()).unwrap();
        let paths: Vec<_> = snap.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            paths,
            vec![
                dir.path().join("a.txt"),
                dir.path().join("b.txt"),
                dir.path().join("sub"),
            ]
        );
        assert_eq!(
            snap.get(&dir.path().join("a.txt")),
            Some(&FileState::Ok(crc32fast::hash(b"hello")))
        );
        assert!(snap.get(&dir.path().join("sub").join("nested.txt")).is_none());
    }

    #[test]
    fn empty_directory() {
        let table = generate_table();
        let dir = tempfile::tempdir().unwrap();
        let snap = take_snapshot(&table, dir.path()).unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.len(), 0);
    }

    #[test]
    fn missing_directory_is_error() {
        let table = generate_table();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = take_snapshot(&table, &missing).unwrap_err();
        assert!(format!("{:#}", err).contains("gone"));
    }

    #[test]
    fn failing_lists_non_ok_entries() {
        let snap = Snapshot::from_entries([
            ("/w/a", FileState::Ok(1)),
            ("/w/b", FileState::NotAccessible),
            ("/w/c", FileState::UndefinedError),
        ]);
        let failing: Vec<_> = snap.failing().map(|(p, _)| p.clone()).collect();
        assert_eq!(failing, vec![PathBuf::from("/w/b"), PathBuf::from("/w/c")]);
    }
}
