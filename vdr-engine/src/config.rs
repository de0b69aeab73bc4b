//! Engine configuration resolution
//!
//! Provides per-field resolution with ENV → TOML → compiled default priority. The result
//! is an explicit [`EngineConfig`] injected into the adapters at construction; request
//! logic never reads the environment.

use std::time::Duration;
use tracing::{info, warn};
use vdr_common::config::TomlConfig;

/// Public VIN registry (NHTSA vPIC)
pub const DEFAULT_REGISTRY_BASE_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles";
/// Application backend serving `/car-data/*`
pub const DEFAULT_CATALOG_BASE_URL: &str = "http://127.0.0.1:8080/api";
/// Public year-range catalog
pub const DEFAULT_YEARS_BASE_URL: &str = "https://www.carqueryapi.com/api/0.3";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const ENV_REGISTRY_BASE_URL: &str = "VDR_REGISTRY_BASE_URL";
pub const ENV_CATALOG_BASE_URL: &str = "VDR_CATALOG_BASE_URL";
pub const ENV_YEARS_BASE_URL: &str = "VDR_YEARS_BASE_URL";
pub const ENV_API_KEY: &str = "VDR_API_KEY";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "VDR_REQUEST_TIMEOUT_SECS";

const USER_AGENT: &str = concat!("vdr/", env!("CARGO_PKG_VERSION"));

/// Upstream endpoints and credentials shared by the adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub registry_base_url: String,
    pub catalog_base_url: String,
    pub years_base_url: String,
    /// Sent as `X-API-Key` to the catalog backend; omitted when `None`
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_base_url: DEFAULT_REGISTRY_BASE_URL.to_string(),
            catalog_base_url: DEFAULT_CATALOG_BASE_URL.to_string(),
            years_base_url: DEFAULT_YEARS_BASE_URL.to_string(),
            api_key: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Resolve every field from the environment, then `toml`, then compiled defaults
    pub fn resolve(toml: &TomlConfig) -> Self {
        let defaults = Self::default();

        let registry_base_url = resolve_field(
            "registry_base_url",
            ENV_REGISTRY_BASE_URL,
            toml.registry_base_url.as_deref(),
        )
        .unwrap_or(defaults.registry_base_url);

        let catalog_base_url = resolve_field(
            "catalog_base_url",
            ENV_CATALOG_BASE_URL,
            toml.catalog_base_url.as_deref(),
        )
        .unwrap_or(defaults.catalog_base_url);

        let years_base_url = resolve_field(
            "years_base_url",
            ENV_YEARS_BASE_URL,
            toml.years_base_url.as_deref(),
        )
        .unwrap_or(defaults.years_base_url);

        let api_key = resolve_api_key(toml);

        let request_timeout = match std::env::var(ENV_REQUEST_TIMEOUT_SECS) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    warn!(value = %raw, "Ignoring invalid {}", ENV_REQUEST_TIMEOUT_SECS);
                    None
                }
            },
            Err(_) => None,
        }
        .or_else(|| {
            toml.request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
        })
        .unwrap_or(defaults.request_timeout);

        Self {
            registry_base_url,
            catalog_base_url,
            years_base_url,
            api_key,
            request_timeout,
            user_agent: defaults.user_agent,
        }
    }

    /// Config pointing all three adapters at one base URL (test servers, local mirrors)
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            registry_base_url: base_url.to_string(),
            catalog_base_url: base_url.to_string(),
            years_base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

/// Resolve the optional catalog API key
///
/// **Priority:** ENV → TOML. Absence is permitted; the header is simply omitted.
pub fn resolve_api_key(toml: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(ENV_API_KEY).ok().filter(|k| is_valid_key(k));
    let toml_key = toml.api_key.clone().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!("API key found in environment and TOML config. Using environment.");
    }

    if env_key.is_some() {
        info!("API key loaded from environment variable");
        return env_key;
    }
    if toml_key.is_some() {
        info!("API key loaded from TOML config");
        return toml_key;
    }

    info!("No API key configured, catalog requests will be sent without X-API-Key");
    None
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn resolve_field(name: &str, env_name: &str, toml_value: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_name) {
        if !value.trim().is_empty() {
            info!(field = name, "Loaded from environment variable {}", env_name);
            return Some(value.trim().to_string());
        }
    }

    toml_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
