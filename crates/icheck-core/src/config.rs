use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::probe::DEFAULT_BUF_SIZE;

/// Startup configuration problems. All of them are fatal before monitoring starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no target directory was provided")]
    MissingDirectory,
    #[error("no check interval was provided")]
    MissingInterval,
    #[error("invalid check interval: must be a positive number of seconds")]
    ZeroInterval,
    #[error("target directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("target {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("read_buffer_bytes must be greater than zero")]
    ZeroBuffer,
    #[error("read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("locate XDG directories: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),
}

/// Optional configuration file (`~/.config/icheck/config.toml`).
/// Every key can be overridden on the command line or via the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Directory whose direct entries are watched.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Seconds between scheduled checks.
    #[serde(default)]
    pub interval_secs: Option<u64>,
    /// Read chunk size used when checksumming (None = 64 KiB).
    #[serde(default)]
    pub read_buffer_bytes: Option<usize>,
}

/// Default config file location: `~/.config/icheck/config.toml`.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("icheck")?;
    Ok(xdg_dirs.get_config_home().join("icheck").join("config.toml"))
}

/// Load a config file from an explicit path.
pub fn load_from_path(path: &Path) -> Result<FileConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the default config file if one exists; a missing file is not an error.
pub fn load_default() -> Result<FileConfig, ConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let cfg = load_from_path(&path)?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

/// Validated settings the monitor runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub directory: PathBuf,
    pub interval: Duration,
    pub read_buffer_bytes: usize,
}

impl Settings {
    /// Merge explicit values (CLI flag or environment) over the file config and validate.
    pub fn resolve(
        file: FileConfig,
        directory: Option<PathBuf>,
        interval_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let directory = directory
            .or(file.directory)
            .ok_or(ConfigError::MissingDirectory)?;
        let interval_secs = interval_secs
            .or(file.interval_secs)
            .ok_or(ConfigError::MissingInterval)?;
        if interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        let read_buffer_bytes = file.read_buffer_bytes.unwrap_or(DEFAULT_BUF_SIZE);
        if read_buffer_bytes == 0 {
            return Err(ConfigError::ZeroBuffer);
        }
        if !directory.exists() {
            return Err(ConfigError::DirectoryNotFound(directory));
        }
        if !directory.is_dir() {
            return Err(ConfigError::NotADirectory(directory));
        }
        Ok(Self {
            directory,
            interval: Duration::from_secs(interval_secs),
            read_buffer_bytes,
        })
    }
}
