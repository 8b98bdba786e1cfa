//! `trica.toml` configuration
//!
//! ```toml
//! [runtime]
//! max_string_bytes = 16777216
//!
//! [history]
//! snapshot_limit = 268435456
//!
//! [log]
//! filter = "warn"
//! ```
//!
//! Every section and key is optional. Unknown keys are rejected so typos do
//! not silently fall back to defaults.

use crate::runtime::DEFAULT_MAX_STRING_BYTES;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "trica.toml";

/// Default snapshot history budget (256 MiB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Ceiling for any single runtime string, in bytes
    #[serde(default = "default_max_string_bytes")]
    pub max_string_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            max_string_bytes: default_max_string_bytes(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Budget for the snapshot history, in bytes
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            snapshot_limit: default_snapshot_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: default_filter(),
        }
    }
}

fn default_max_string_bytes() -> usize {
    DEFAULT_MAX_STRING_BYTES
}

fn default_snapshot_limit() -> usize {
    DEFAULT_SNAPSHOT_LIMIT
}

fn default_filter() -> String {
    "warn".into()
}

impl Config {
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Load `explicit` if given, else `trica.toml` in `dir` if present, else defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("", Path::new("trica.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.runtime.max_string_bytes, 16 * 1024 * 1024);
        assert_eq!(config.history.snapshot_limit, 256 * 1024 * 1024);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_partial_sections() {
        let text = "[runtime]\nmax_string_bytes = 64\n\n[log]\nfilter = \"trica=debug\"\n";
        let config = Config::from_toml_str(text, Path::new("trica.toml")).unwrap();

        assert_eq!(config.runtime.max_string_bytes, 64);
        assert_eq!(config.history, HistoryConfig::default());
        assert_eq!(config.log.filter, "trica=debug");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = Config::from_toml_str("[runtime]\nmax_string = 1\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("x.toml"));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap(), Config::default());

        let mut file = std::fs::File::create(dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        writeln!(file, "[history]\nsnapshot_limit = 1024").unwrap();
        drop(file);

        let config = Config::discover(None, dir.path()).unwrap();
        assert_eq!(config.history.snapshot_limit, 1024);

        let missing = dir.path().join("missing.toml");
        let err = Config::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
