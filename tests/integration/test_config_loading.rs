use ducatify::core::config::{ConfigLoader, TransformerConfig};
use ducatify::core::ErrorCategory;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_ducatify_env() {
    for v in &[
        "DUCATIFY_RELEASE_VERSION",
        "DUCATIFY_DB_PERSISTENT_DISK",
        "DUCATIFY_DB_RESOURCE_POOL",
        "DUCATIFY_DB_NETWORK",
        "DUCATIFY_DB_USERNAME",
        "DUCATIFY_DB_PASSWORD",
        "DUCATIFY_DB_HOST",
        "DUCATIFY_DB_PORT",
    ] {
        env::remove_var(v);
    }
}

/// Test integration of config loading with environment variables
#[test]
#[serial]
fn test_config_loading_integration() {
    clear_ducatify_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ducatify.toml");

    let config_content = r#"
release_version = "0.12.0"

[database]
anchor_job = "database_z2"
persistent_disk = 2048
password = "from-file"

[connet]
subdomain = "overlay"
port = 4100

[logging]
default_level = "debug"
"#;
    fs::write(&config_path, config_content).unwrap();

    let config = ConfigLoader::load(Some(&config_path)).unwrap();
    assert_eq!(config.release_version, "0.12.0");
    assert_eq!(config.database.anchor_job, "database_z2");
    assert_eq!(config.database.persistent_disk, 2048);
    assert_eq!(config.database.password, "from-file");
    assert_eq!(config.connet.subdomain, "overlay");
    assert_eq!(config.connet.port, 4100);

    // untouched sections keep their defaults
    let defaults = TransformerConfig::default();
    assert_eq!(config.database.username, defaults.database.username);
    assert_eq!(config.garden, defaults.garden);
    assert_eq!(config.nsync, defaults.nsync);
}

#[test]
#[serial]
fn test_env_overrides_take_precedence_over_file() {
    clear_ducatify_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ducatify.toml");
    fs::write(
        &config_path,
        "release_version = \"0.12.0\"\n[database]\npassword = \"from-file\"\n",
    )
    .unwrap();

    env::set_var("DUCATIFY_RELEASE_VERSION", "0.13.0");
    env::set_var("DUCATIFY_DB_PASSWORD", "from-env");
    env::set_var("DUCATIFY_DB_PORT", "6432");

    let config = ConfigLoader::load(Some(&config_path)).unwrap();
    clear_ducatify_env();

    assert_eq!(config.release_version, "0.13.0");
    assert_eq!(config.database.password, "from-env");
    assert_eq!(config.database.port, 6432);
}

#[test]
#[serial]
fn test_defaults_without_config_file() {
    clear_ducatify_env();
    let config = ConfigLoader::load(None).unwrap();
    assert_eq!(config, TransformerConfig::default());
    assert_eq!(config.release_version, "latest");
    assert_eq!(config.database.anchor_job, "database_z1");
    assert_eq!(config.database.persistent_disk, 256);
    assert_eq!(config.connet.port, 4002);
}

#[test]
#[serial]
fn test_invalid_env_override_is_reported() {
    clear_ducatify_env();
    env::set_var("DUCATIFY_DB_PERSISTENT_DISK", "lots");
    let err = ConfigLoader::load(None).unwrap_err();
    clear_ducatify_env();

    assert_eq!(err.category, ErrorCategory::ConfigurationError);
    assert!(err.message.contains("DUCATIFY_DB_PERSISTENT_DISK"));
}

#[test]
#[serial]
fn test_invalid_values_fail_validation() {
    clear_ducatify_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ducatify.toml");
    fs::write(&config_path, "[database]\npersistent_disk = 0\n").unwrap();

    let err = ConfigLoader::load(Some(&config_path)).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
}

#[test]
#[serial]
fn test_malformed_toml_is_a_configuration_error() {
    clear_ducatify_env();
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("ducatify.toml");
    fs::write(&config_path, "release_version = [unterminated\n").unwrap();

    let err = ConfigLoader::load(Some(&config_path)).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConfigurationError);
    assert!(err.message.contains("failed to parse config file"));
}

#[test]
#[serial]
fn test_missing_explicit_config_file() {
    clear_ducatify_env();
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::load(Some(&temp_dir.path().join("absent.toml"))).unwrap_err();
    assert_eq!(err.category, ErrorCategory::CallerInput);
}
