//! Configuration validation
//!
//! This module provides validation logic for configuration files.

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult};

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.directories.is_empty() {
        return Err(ConfigError::Invalid(
            "At least one scripts directory is required".to_string(),
        ));
    }

    validate_extensions(&config.extensions)?;
    validate_entry_point(&config.entry_point)?;

    if config.private_prefix.chars().count() != 1 {
        return Err(ConfigError::Invalid(format!(
            "private_prefix must be a single character, got '{}'",
            config.private_prefix
        )));
    }

    if config.page_size == 0 {
        return Err(ConfigError::Invalid(
            "page_size must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Validate the list of recognised script extensions
fn validate_extensions(extensions: &[String]) -> ConfigResult<()> {
    if extensions.is_empty() {
        return Err(ConfigError::Invalid(
            "At least one script extension is required".to_string(),
        ));
    }

    for ext in extensions {
        if ext.is_empty() || ext.contains('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "Invalid extension: '{}'. Use the bare extension, e.g. 'ts'",
                ext
            )));
        }
    }

    Ok(())
}

/// The entry point must be a plain file name inside the script directory
fn validate_entry_point(entry_point: &str) -> ConfigResult<()> {
    if entry_point.is_empty() || entry_point.contains(['/', '\\']) {
        return Err(ConfigError::Invalid(format!(
            "entry_point must be a file name, got '{}'",
            entry_point
        )));
    }
    Ok(())
}
