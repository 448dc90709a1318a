//! Runtime configuration.
//!
//! Built from defaults, then an optional YAML file (`WAVES_CONFIG`, or
//! `waves.yaml` in the working directory), then environment overrides.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::DEFAULT_CHAR_DATA_DIR;
use crate::logging::DEFAULT_LOG_FILTER;

pub const DEFAULT_CONFIG_PATH: &str = "waves.yaml";

pub const ENV_CONFIG_PATH: &str = "WAVES_CONFIG";
pub const ENV_DATA_DIR: &str = "WAVES_CHAR_DATA_DIR";
pub const ENV_LOG: &str = "WAVES_LOG";
pub const ENV_LOAD_WORKERS: &str = "WAVES_LOAD_WORKERS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding one `<char_id>.json` per character.
    pub data_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    /// Threads used to decode dataset files; 0 uses every core.
    pub load_workers: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_CHAR_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            load_workers: 0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Apply `WAVES_*` overrides on top of this config.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        if let Some(raw) = lookup(ENV_LOAD_WORKERS) {
            self.load_workers = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOAD_WORKERS,
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }
}
