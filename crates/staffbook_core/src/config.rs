//! Runtime configuration for the data root and logging.
//!
//! Values resolve in three layers: built-in defaults, then `STAFFBOOK_*`
//! environment variables, then explicit overrides from the caller (CLI flags).

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Environment variable overriding the data root.
pub const ENV_DATA_DIR: &str = "STAFFBOOK_DATA_DIR";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "STAFFBOOK_LOG_LEVEL";
/// Environment variable enabling file logging in the given directory.
pub const ENV_LOG_DIR: &str = "STAFFBOOK_LOG_DIR";

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the `Internal` and `External` record folders.
    pub data_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// File logging target; `None` keeps logging disabled.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            data_dir: read(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            log_level: read(ENV_LOG_LEVEL)
                .map(|value| value.trim().to_string())
                .unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from).or(defaults.log_dir),
        }
    }

    /// Applies explicit overrides on top of this configuration.
    pub fn with_overrides(
        self,
        data_dir: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            data_dir: data_dir.unwrap_or(self.data_dir),
            log_level: log_level.unwrap_or(self.log_level),
            log_dir: log_dir.or(self.log_dir),
        }
    }
}
