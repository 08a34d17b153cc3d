//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Herdbook reads one optional TOML file. Values are resolved in this
//! order (later overrides earlier):
//!
//! 1. Built-in defaults
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$HERDBOOK_CONFIG` if set
//! 2. `<platform config dir>/herdbook/config.toml`
//!
//! A missing file is not an error; every key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// On-disk configuration schema.
///
/// Unknown keys are rejected so that a typo fails loudly instead of
/// being silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Root directory for colony storage.
    pub data_dir: Option<PathBuf>,
    /// Vertical gap between layout generations.
    pub vertical_gap: Option<f64>,
}

/// Loaded configuration with defaults applied.
#[derive(Debug, Clone, Default)]
pub struct Config {
    file: ConfigFile,
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match std::env::var_os("HERDBOOK_CONFIG") {
            Some(p) => Some(PathBuf::from(p)),
            None => dirs::config_dir().map(|d| d.join("herdbook").join("config.toml")),
        };
        match path {
            Some(p) if p.exists() => Self::load_from(&p),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Configured data directory, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.file.data_dir.as_deref()
    }

    /// Vertical layout gap, defaulting to 1.0.
    pub fn vertical_gap(&self) -> f64 {
        self.file.vertical_gap.unwrap_or(1.0)
    }

    /// Path the configuration was loaded from, if a file was read.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
