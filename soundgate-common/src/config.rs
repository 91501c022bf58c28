//! Configuration loading and resolution
//!
//! Ambient settings for the intake pipeline are resolved per field with
//! Environment → TOML → compiled default priority.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Default EventBus channel capacity
pub const DEFAULT_EVENT_CAPACITY: usize = 100;
/// Default number of entries a filesystem directory reader yields per batch
pub const DEFAULT_DIR_BATCH_SIZE: usize = 64;
/// Default logging level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging section of the TOML config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// On-disk configuration file shape
///
/// All fields are optional; missing fields fall back to environment
/// variables and then compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// EventBus channel capacity
    pub event_capacity: Option<usize>,
    /// Directory reader batch size
    pub dir_batch_size: Option<usize>,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
    }
}

/// Resolved intake configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// EventBus channel capacity
    pub event_capacity: usize,
    /// Number of entries a filesystem directory reader yields per batch
    pub dir_batch_size: usize,
    /// Logging level filter
    pub log_level: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            dir_batch_size: DEFAULT_DIR_BATCH_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl IntakeConfig {
    /// Resolve configuration with Environment → TOML → default priority
    ///
    /// A missing config file is not an error; a file that exists but
    /// fails to parse is.
    pub fn resolve() -> Result<Self> {
        let toml_config = match config_file_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Loading config file");
                TomlConfig::load(&path)?
            }
            _ => TomlConfig::default(),
        };
        Ok(Self::from_sources(&toml_config))
    }

    /// Merge environment overrides over a parsed TOML config
    pub fn from_sources(toml_config: &TomlConfig) -> Self {
        let event_capacity = resolve_usize(
            "SOUNDGATE_EVENT_CAPACITY",
            toml_config.event_capacity,
            DEFAULT_EVENT_CAPACITY,
        );
        let dir_batch_size = resolve_usize(
            "SOUNDGATE_DIR_BATCH_SIZE",
            toml_config.dir_batch_size,
            DEFAULT_DIR_BATCH_SIZE,
        );
        let log_level = match std::env::var("SOUNDGATE_LOG") {
            Ok(level) if !level.trim().is_empty() => level,
            _ => toml_config
                .logging
                .level
                .clone()
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        Self {
            event_capacity,
            dir_batch_size,
            log_level,
        }
    }
}

/// Resolve a numeric field with Environment → TOML → default priority
fn resolve_usize(env_var: &str, toml_value: Option<usize>, default: usize) -> usize {
    if let Ok(raw) = std::env::var(env_var) {
        match raw.parse::<usize>() {
            Ok(value) if value > 0 => {
                if toml_value.is_some_and(|t| t != value) {
                    warn!(
                        "{} set in both environment and config file; using environment ({})",
                        env_var, value
                    );
                }
                return value;
            }
            _ => warn!("{} is not a positive integer, ignoring: {:?}", env_var, raw),
        }
    }
    toml_value.unwrap_or(default)
}

/// Configuration file path for the platform
///
/// Priority: `SOUNDGATE_CONFIG` environment variable, then
/// `<config dir>/soundgate/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("SOUNDGATE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("soundgate").join("config.toml"))
}
