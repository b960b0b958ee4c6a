#![allow(clippy::result_large_err)]

use super::{ConfigValidator, TransformerConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::Path;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the effective configuration: defaults, then the optional config
    /// file, then environment overrides. The result is validated.
    ///
    /// An explicitly named file that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<TransformerConfig, AppError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?.ok_or_else(|| {
                AppError::new(
                    ErrorCategory::CallerInput,
                    format!("config file {} does not exist", path.display()),
                )
            })?,
            None => TransformerConfig::default(),
        };

        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<TransformerConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("failed to read config file {}: {}", path.display(), e),
            )
        })?;

        let config: TransformerConfig = toml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigurationError,
                format!("failed to parse config file {}: {}", path.display(), e),
            )
        })?;

        Ok(Some(config))
    }

    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut TransformerConfig) -> Result<(), AppError> {
        if let Ok(version) = env::var("DUCATIFY_RELEASE_VERSION") {
            config.release_version = version;
        }

        if let Ok(disk) = env::var("DUCATIFY_DB_PERSISTENT_DISK") {
            config.database.persistent_disk = parse_env("DUCATIFY_DB_PERSISTENT_DISK", &disk)?;
        }

        if let Ok(pool) = env::var("DUCATIFY_DB_RESOURCE_POOL") {
            config.database.resource_pool = pool;
        }

        if let Ok(network) = env::var("DUCATIFY_DB_NETWORK") {
            config.database.network = network;
        }

        if let Ok(username) = env::var("DUCATIFY_DB_USERNAME") {
            config.database.username = username;
        }

        if let Ok(password) = env::var("DUCATIFY_DB_PASSWORD") {
            config.database.password = password;
        }

        if let Ok(host) = env::var("DUCATIFY_DB_HOST") {
            config.database.host = host;
        }

        if let Ok(port) = env::var("DUCATIFY_DB_PORT") {
            config.database.port = parse_env("DUCATIFY_DB_PORT", &port)?;
        }

        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "DUCATIFY_RELEASE_VERSION - Override the ducati release version (default: latest)",
            "DUCATIFY_DB_PERSISTENT_DISK - Override the ducati_db persistent disk size (default: 256)",
            "DUCATIFY_DB_RESOURCE_POOL - Override the ducati_db resource pool (default: database_z1)",
            "DUCATIFY_DB_NETWORK - Override the ducati_db network (default: diego1)",
            "DUCATIFY_DB_USERNAME - Override the ducati database user (default: ducati_daemon)",
            "DUCATIFY_DB_PASSWORD - Override the ducati database password",
            "DUCATIFY_DB_HOST - Override the ducati database host (default: ducati-db.service.cf.internal)",
            "DUCATIFY_DB_PORT - Override the ducati database port (default: 5432)",
        ]
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, AppError> {
    raw.trim().parse::<T>().map_err(|_| {
        AppError::new(
            ErrorCategory::ConfigurationError,
            format!("{} must be a positive integer, got '{}'", name, raw),
        )
    })
}
