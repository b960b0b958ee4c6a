#![allow(clippy::result_large_err)]

use super::TransformerConfig;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration rules
    pub fn validate(config: &TransformerConfig) -> Result<(), AppError> {
        if config.release_version.trim().is_empty() {
            return Err(invalid("release_version cannot be empty"));
        }

        let database = &config.database;
        for (field, value) in [
            ("database.anchor_job", &database.anchor_job),
            ("database.resource_pool", &database.resource_pool),
            ("database.network", &database.network),
            ("database.name", &database.name),
            ("database.username", &database.username),
            ("database.host", &database.host),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{} cannot be empty", field)));
            }
        }

        if database.persistent_disk == 0 {
            return Err(invalid("database.persistent_disk must be greater than zero"));
        }

        if database.port == 0 || config.connet.port == 0 {
            return Err(invalid("ports must be greater than zero"));
        }

        if config.connet.subdomain.trim().is_empty() {
            return Err(invalid("connet.subdomain cannot be empty"));
        }

        if config.nsync.network_id.trim().is_empty() {
            return Err(invalid("nsync.network_id cannot be empty"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::new(ErrorCategory::ConfigurationError, message)
}
