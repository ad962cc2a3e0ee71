//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values are
//! well-formed and that cross-field invariants hold.

use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Accepted `logging.level` values.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Accepted `logging.format` values.
pub const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_backup(config)?;
    validate_restore(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_backup(config: &Config) -> ConfigResult<()> {
    if let Some(scope) = &config.backup.scope_symlinks {
        validate_scope("backup.scope_symlinks", scope)?;
    }

    if !config.backup.allow_devices.is_empty() && !config.backup.one_file_system {
        return Err(ConfigError::ValidationError {
            field: "backup.allow_devices".to_owned(),
            message: "only meaningful together with backup.one_file_system = true".to_owned(),
        });
    }

    if config
        .backup
        .allow_devices
        .iter()
        .any(|p| p.as_os_str().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "backup.allow_devices".to_owned(),
            message: "device roots must not be empty".to_owned(),
        });
    }

    Ok(())
}

fn validate_restore(config: &Config) -> ConfigResult<()> {
    if let Some(scope) = &config.restore.scope_symlinks {
        validate_scope("restore.scope_symlinks", scope)?;
    }
    Ok(())
}

fn validate_scope(field: &str, scope: &Path) -> ConfigResult<()> {
    if scope.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: field.to_owned(),
            message: "scope path must not be empty".to_owned(),
        });
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unsupported log level '{}'; expected one of: {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unsupported log format '{}'; expected one of: {}",
                config.logging.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    Ok(())
}
