//! Configuration file model and loading
//!
//! The TOML file is optional. A missing file yields defaults plus a warning; a file that
//! exists but does not parse is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "VDR_CONFIG";

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter directive (e.g. "info", "vdr_engine=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Contents of `config.toml`
///
/// Every upstream field is optional; unset fields fall through to the environment or to
/// compiled defaults during engine configuration resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the public VIN registry
    #[serde(default)]
    pub registry_base_url: Option<String>,
    /// Base URL of the application backend serving `/car-data/*`
    #[serde(default)]
    pub catalog_base_url: Option<String>,
    /// Base URL of the year-range catalog
    #[serde(default)]
    pub years_base_url: Option<String>,
    /// API key sent as `X-API-Key` to the catalog backend
    #[serde(default)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Resolve the configuration file path
///
/// Priority: `VDR_CONFIG` environment variable, then `<config_dir>/vdr/config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("vdr").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Load the TOML configuration at `path`
///
/// Missing file → defaults (with a warning). Unreadable or malformed file → `Error::Config`.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            path = %path.display(),
            "Config file not found, using defaults"
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}
