//! Application configuration loading from clinic.toml
//!
//! This module provides the optional TOML configuration for the clinic
//! system: where the data directory lives, the clinic name printed on
//! artifacts, and the auto-save timings. Every field has a production
//! default, so running without a config file is the normal case rather
//! than an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::errors::{Error, Result};
use crate::store::AutosaveConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_VAR: &str = "CLINIC_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "clinic.toml";

/// Configuration structure representing the entire clinic.toml file
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the storage backend keeps its files in
    pub data_dir: PathBuf,
    /// Clinic name stamped on backups, exports, and printed headers
    pub clinic_name: String,
    /// Auto-save timing overrides
    pub autosave: AutosaveSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("clinic-data"),
            clinic_name: "Ijaz Ultra Sound and Digital X-Ray".to_string(),
            autosave: AutosaveSettings::default(),
        }
    }
}

/// Auto-save timings in milliseconds
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AutosaveSettings {
    /// Quiet period after the last change before a debounced save fires
    pub debounce_ms: u64,
    /// Unconditional backstop save interval
    pub periodic_ms: u64,
}

impl Default for AutosaveSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 2_000,
            periodic_ms: 30_000,
        }
    }
}

impl AutosaveSettings {
    /// Converts the millisecond settings into the engine's config.
    #[must_use]
    pub const fn to_autosave_config(self) -> AutosaveConfig {
        AutosaveConfig {
            debounce: Duration::from_millis(self.debounce_ms),
            periodic: Duration::from_millis(self.periodic_ms),
        }
    }
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse clinic.toml: {e}"),
    })
}

/// Loads configuration from `$CLINIC_CONFIG`, falling back to
/// `./clinic.toml`, falling back to the built-in defaults.
///
/// A missing file is not an error; an unreadable or malformed one is.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var(CONFIG_PATH_VAR)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        load_config(path)
    } else {
        info!(path = %path.display(), "no config file, using defaults");
        Ok(AppConfig::default())
    }
}
