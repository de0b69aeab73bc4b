//! Unit tests for configuration loading and graceful degradation
//!
//! Covers:
//! - Missing TOML files do not cause failure
//! - Malformed TOML files surface as configuration errors
//! - Config path resolution priority (VDR_CONFIG, then platform default)
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate VDR_CONFIG are marked with #[serial].

use serial_test::serial;
use std::env;
use std::path::PathBuf;
use vdr_common::config::{default_config_path, load_toml_config, LoggingConfig, TomlConfig};
use vdr_common::Error;

#[test]
fn test_missing_file_yields_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("does-not-exist.toml");

    let config = load_toml_config(&path).unwrap();

    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.logging, LoggingConfig::default());
}

#[test]
fn test_full_file_is_loaded() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
registry_base_url = "https://registry.example/api/vehicles"
catalog_base_url = "https://backend.example/api"
years_base_url = "https://years.example/api/0.3"
api_key = "secret"
request_timeout_secs = 5

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_toml_config(&path).unwrap();

    assert_eq!(
        config.registry_base_url.as_deref(),
        Some("https://registry.example/api/vehicles")
    );
    assert_eq!(config.catalog_base_url.as_deref(), Some("https://backend.example/api"));
    assert_eq!(config.years_base_url.as_deref(), Some("https://years.example/api/0.3"));
    assert_eq!(config.api_key.as_deref(), Some("secret"));
    assert_eq!(config.request_timeout_secs, Some(5));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "request_timeout_secs = \"soon\"").unwrap();

    let result = load_toml_config(&path);

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_config_path_env_override() {
    env::set_var("VDR_CONFIG", "/tmp/vdr-test/config.toml");

    let path = default_config_path().unwrap();
    assert_eq!(path, PathBuf::from("/tmp/vdr-test/config.toml"));

    env::remove_var("VDR_CONFIG");
}

#[test]
#[serial]
fn test_config_path_blank_env_falls_back_to_platform_default() {
    env::set_var("VDR_CONFIG", "   ");

    let path = default_config_path().unwrap();
    assert!(path.ends_with("vdr/config.toml"));

    env::remove_var("VDR_CONFIG");
}
