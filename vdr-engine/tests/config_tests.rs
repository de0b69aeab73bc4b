//! Engine configuration resolution tests
//!
//! Priority per field: environment variable → TOML file → compiled default.
//!
//! Note: tests that touch VDR_* environment variables are marked #[serial] so they do
//! not race each other.

use serial_test::serial;
use std::time::Duration;
use vdr_common::config::{load_toml_config, TomlConfig};
use vdr_engine::config::{
    resolve_api_key, DEFAULT_CATALOG_BASE_URL, DEFAULT_REGISTRY_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_YEARS_BASE_URL, ENV_API_KEY, ENV_CATALOG_BASE_URL,
    ENV_REGISTRY_BASE_URL, ENV_REQUEST_TIMEOUT_SECS, ENV_YEARS_BASE_URL,
};
use vdr_engine::EngineConfig;

const ALL_ENV: &[&str] = &[
    ENV_REGISTRY_BASE_URL,
    ENV_CATALOG_BASE_URL,
    ENV_YEARS_BASE_URL,
    ENV_API_KEY,
    ENV_REQUEST_TIMEOUT_SECS,
];

fn clear_env() {
    for name in ALL_ENV {
        std::env::remove_var(name);
    }
}

fn toml_with_everything() -> TomlConfig {
    TomlConfig {
        registry_base_url: Some("http://toml-registry".to_string()),
        catalog_base_url: Some("http://toml-catalog/api".to_string()),
        years_base_url: Some("http://toml-years".to_string()),
        api_key: Some("toml-key".to_string()),
        request_timeout_secs: Some(30),
        ..TomlConfig::default()
    }
}

#[test]
#[serial]
fn test_defaults_when_env_and_toml_empty() {
    clear_env();

    let config = EngineConfig::resolve(&TomlConfig::default());

    assert_eq!(config.registry_base_url, DEFAULT_REGISTRY_BASE_URL);
    assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_BASE_URL);
    assert_eq!(config.years_base_url, DEFAULT_YEARS_BASE_URL);
    assert_eq!(config.api_key, None);
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
}

#[test]
#[serial]
fn test_toml_overrides_defaults() {
    clear_env();

    let config = EngineConfig::resolve(&toml_with_everything());

    assert_eq!(config.registry_base_url, "http://toml-registry");
    assert_eq!(config.catalog_base_url, "http://toml-catalog/api");
    assert_eq!(config.years_base_url, "http://toml-years");
    assert_eq!(config.api_key.as_deref(), Some("toml-key"));
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    clear_env();
    std::env::set_var(ENV_CATALOG_BASE_URL, "http://env-catalog/api");
    std::env::set_var(ENV_API_KEY, "env-key");
    std::env::set_var(ENV_REQUEST_TIMEOUT_SECS, "5");

    let config = EngineConfig::resolve(&toml_with_everything());

    assert_eq!(config.catalog_base_url, "http://env-catalog/api");
    assert_eq!(config.api_key.as_deref(), Some("env-key"));
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    // Untouched fields still come from TOML
    assert_eq!(config.registry_base_url, "http://toml-registry");

    clear_env();
}

#[test]
#[serial]
fn test_blank_env_values_ignored() {
    clear_env();
    std::env::set_var(ENV_REGISTRY_BASE_URL, "   ");
    std::env::set_var(ENV_API_KEY, "");

    let config = EngineConfig::resolve(&toml_with_everything());

    assert_eq!(config.registry_base_url, "http://toml-registry");
    assert_eq!(config.api_key.as_deref(), Some("toml-key"));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_timeout_env_falls_back() {
    clear_env();
    std::env::set_var(ENV_REQUEST_TIMEOUT_SECS, "soon");

    let config = EngineConfig::resolve(&toml_with_everything());
    assert_eq!(config.request_timeout, Duration::from_secs(30));

    std::env::set_var(ENV_REQUEST_TIMEOUT_SECS, "0");
    let config = EngineConfig::resolve(&TomlConfig::default());
    assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);

    clear_env();
}

#[test]
#[serial]
fn test_api_key_absent_is_permitted() {
    clear_env();

    let toml = TomlConfig {
        api_key: Some("   ".to_string()),
        ..TomlConfig::default()
    };

    assert_eq!(resolve_api_key(&toml), None);
}

#[test]
#[serial]
fn test_resolve_from_config_file() {
    clear_env();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
catalog_base_url = "http://127.0.0.1:3000/api"
api_key = "file-key"

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let toml = load_toml_config(&path).unwrap();
    let config = EngineConfig::resolve(&toml);

    assert_eq!(toml.logging.level, "debug");
    assert_eq!(config.catalog_base_url, "http://127.0.0.1:3000/api");
    assert_eq!(config.api_key.as_deref(), Some("file-key"));
    assert_eq!(config.registry_base_url, DEFAULT_REGISTRY_BASE_URL);
}
