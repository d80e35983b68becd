//! Application configuration loaded from `portal.toml`.
//!
//! Every setting has a default, so a missing file is not an error for
//! [`load_default_config`]. Cycle definitions in the file replace the built-in
//! compliance catalogue as the first-run seed.

/// Database configuration and connection management
pub mod database;

use crate::{
    catalogue::CycleTemplate,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "portal.toml";

/// Configuration structure representing the whole `portal.toml` file
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Cycles whose deadline is at most this many days away are "upcoming"
    #[serde(default = "default_upcoming_window_days")]
    pub upcoming_window_days: i64,
    /// How many recently updated tickets the dashboard lists
    #[serde(default = "default_recent_activity_limit")]
    pub recent_activity_limit: usize,
    /// Cycle catalogue overriding the built-in one
    #[serde(default)]
    pub cycles: Vec<CycleTemplate>,
}

const fn default_upcoming_window_days() -> i64 {
    crate::core::rollover::UPCOMING_WINDOW_DAYS
}

const fn default_recent_activity_limit() -> usize {
    5
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            upcoming_window_days: default_upcoming_window_days(),
            recent_activity_limit: default_recent_activity_limit(),
            cycles: Vec::new(),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A cycle uses an unknown frequency
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PortalConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<PortalConfig> {
    let config: PortalConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse portal.toml: {e}"),
    })?;

    if config.upcoming_window_days < 1 {
        return Err(Error::Config {
            message: "upcoming_window_days must be at least 1".to_string(),
        });
    }

    Ok(config)
}

/// Loads `./portal.toml`, falling back to defaults when the file is absent.
pub fn load_default_config() -> Result<PortalConfig> {
    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        load_config(DEFAULT_CONFIG_PATH)
    } else {
        tracing::info!("No {DEFAULT_CONFIG_PATH} found, using default configuration");
        Ok(PortalConfig::default())
    }
}
