//! Runtime configuration.
//!
//! Settings come from a JSON file, then `VIZORA_<FIELD>` environment
//! variables override individual fields:
//!
//! ```text
//! VIZORA_MAX_SIZE_MB=250
//! VIZORA_DATA_DIRECTORY=/srv/data
//! VIZORA_LOG_LEVEL=debug
//! ```
//!
//! # Config Location
//!
//! `vizora.config.json` in the working directory if present, otherwise
//! `<config dir>/vizora/config.json` (e.g. `~/.config/vizora/config.json`).

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_SIZE_MB, DEFAULT_TYPE_SAMPLE_SIZE, SNIFF_SAMPLE_BYTES,
};
use crate::logging::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "vizora.config.json";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "VIZORA_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizoraConfig {
    /// Fallback directory searched when a data path does not exist
    pub data_directory: PathBuf,
    /// Maximum loadable file size in MB
    pub max_size_mb: u64,
    /// Number of dataset snapshots kept by `DatasetRegistry::get`
    pub cache_capacity: usize,
    /// Leading rows sampled for dominant column types
    pub type_sample_size: usize,
    /// Characters inspected when sniffing a CSV delimiter
    pub sniff_sample_bytes: usize,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for VizoraConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from("data"),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            type_sample_size: DEFAULT_TYPE_SAMPLE_SIZE,
            sniff_sample_bytes: SNIFF_SAMPLE_BYTES,
            log_level: "info".to_string(),
            log_format: LogFormat::Full,
        }
    }
}

impl VizoraConfig {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    /// Read a config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` (or the default location) and apply environment
    /// overrides. A missing or unreadable file falls back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut config = match path {
            Some(p) if p.exists() => match Self::load(&p) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", p.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        };

        config.apply_env(std::env::vars());
        config
    }

    /// Apply `VIZORA_*` overrides. Values that fail to parse are ignored.
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let field = field.to_lowercase();
            let value = value.trim();

            let applied = match field.as_str() {
                "data_directory" => {
                    self.data_directory = PathBuf::from(value);
                    true
                }
                "max_size_mb" => set_parsed(&mut self.max_size_mb, value),
                "cache_capacity" => set_parsed(&mut self.cache_capacity, value),
                "type_sample_size" => set_parsed(&mut self.type_sample_size, value),
                "sniff_sample_bytes" => set_parsed(&mut self.sniff_sample_bytes, value),
                "log_level" => {
                    self.log_level = value.to_string();
                    true
                }
                "log_format" => set_parsed(&mut self.log_format, value),
                _ => {
                    tracing::debug!("Ignoring unknown setting {}", key);
                    continue;
                }
            };

            if applied {
                tracing::debug!("Set {} from environment", field);
            } else {
                tracing::warn!("Ignoring {}: cannot parse {:?}", key, value);
            }
        }
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, value: &str) -> bool {
    match value.parse() {
        Ok(v) => {
            *slot = v;
            true
        }
        Err(_) => false,
    }
}

/// Working-directory config if present, else the per-user config path
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir().map(|p| p.join("vizora").join("config.json"))
}
