//! Scratch directory fixture for end-to-end integrity tests.

use icheck_core::config::{FileConfig, Settings};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub struct WatchedDir {
    dir: TempDir,
}

impl WatchedDir {
    /// Creates a directory holding `files` (name, content).
    pub fn with_files(files: &[(&str, &[u8])]) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        for (name, content) in files {
            fs::write(dir.path().join(name), content).expect("write fixture file");
        }
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &[u8]) {
        fs::write(self.path(name), content).expect("rewrite fixture file");
    }

    pub fn remove(&self, name: &str) {
        fs::remove_file(self.path(name)).expect("remove fixture file");
    }

    /// Creates a named pipe with no writer attached.
    #[cfg(unix)]
    pub fn make_fifo(&self, name: &str) {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        let path = CString::new(self.path(name).as_os_str().as_bytes()).expect("fifo path");
        let rc = unsafe { libc::mkfifo(path.as_ptr(), 0o600) };
        assert_eq!(rc, 0, "mkfifo {}", name);
    }

    pub fn settings(&self, interval_secs: u64) -> Settings {
        Settings::resolve(
            FileConfig::default(),
            Some(self.dir.path().to_path_buf()),
            Some(interval_secs),
        )
        .expect("valid settings")
    }
}
