//! Probe one file: stream it through the checksum engine and classify the outcome.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::checksum::{self, Crc32Table};

/// Default read chunk size (64 KiB); memory use per probe is bounded by it.
pub const DEFAULT_BUF_SIZE: usize = 64 * 1024;

/// State of one watched file at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// File was read to the end; carries its CRC-32.
    Ok(u32),
    NotFound,
    NotAccessible,
    UndefinedError,
}

impl FileState {
    pub fn is_ok(&self) -> bool {
        matches!(self, FileState::Ok(_))
    }

    pub fn checksum(&self) -> Option<u32> {
        match self {
            FileState::Ok(sum) => Some(*sum),
            _ => None,
        }
    }

    /// Name used in log lines (`OK`, `NOT_FOUND`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            FileState::Ok(_) => "OK",
            FileState::NotFound => "NOT_FOUND",
            FileState::NotAccessible => "NOT_ACCESSIBLE",
            FileState::UndefinedError => "UNDEFINED_ERROR",
        }
    }

    /// Map an I/O error (from open or read) to a file state.
    pub fn from_io_error(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::PermissionDenied => FileState::NotAccessible,
            io::ErrorKind::NotFound => FileState::NotFound,
            _ => FileState::UndefinedError,
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checksum `path` with the default buffer size.
pub fn probe(table: &Crc32Table, path: &Path) -> FileState {
    probe_with_buffer(table, path, DEFAULT_BUF_SIZE)
}

/// Checksum `path`, reading `buf_size` bytes at a time.
///
/// Open and read failures are both classified; a file that fails mid-stream is
/// never reported as `Ok` with a partial checksum. Only regular files (or
/// symlinks to them) are read; FIFOs, sockets, devices and directories are
/// `UndefinedError` and never block the caller.
pub fn probe_with_buffer(table: &Crc32Table, path: &Path, buf_size: usize) -> FileState {
    let mut f = match open_nonblocking(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::trace!(path = %path.display(), "open failed: {}", e);
            return FileState::from_io_error(&e);
        }
    };
    match f.metadata() {
        Ok(meta) if meta.is_file() => {}
        Ok(meta) => {
            tracing::debug!(path = %path.display(), file_type = ?meta.file_type(), "not a regular file");
            return FileState::UndefinedError;
        }
        Err(e) => return FileState::from_io_error(&e),
    }
    let mut buf = vec![0u8; buf_size.max(1)];
    let mut sum = 0u32;
    loop {
        match f.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => sum = checksum::update(table, sum, &buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(path = %path.display(), "read failed: {}", e);
                return FileState::from_io_error(&e);
            }
        }
    }
    FileState::Ok(sum)
}

/// Open for reading without blocking on FIFOs that have no writer.
#[cfg(unix)]
fn open_nonblocking(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    std::fs::OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK)
        .open(path)
}

#[cfg(not(unix))]
fn open_nonblocking(path: &Path) -> io::Result<File> {
    File::open(path)
}
