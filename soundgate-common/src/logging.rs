//! Logging initialization
//!
//! Hosts embedding the pipeline call [`init`] once at startup; the level
//! normally comes from [`crate::config::IntakeConfig::log_level`].

use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber
///
/// `level` accepts anything `EnvFilter` understands ("info",
/// "soundgate_intake=debug", ...). Fails if a global subscriber is
/// already installed.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
