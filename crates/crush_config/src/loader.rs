//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CrushConfig;
use std::path::Path;

/// File name of the configuration inside a project directory.
pub const CONFIG_FILE: &str = "crush.toml";

/// Loads and validates a `crush.toml` configuration from a project directory.
///
/// Reads `<project_dir>/crush.toml`, parses it, and validates required fields.
pub fn load_config(project_dir: &Path) -> Result<CrushConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `crush.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CrushConfig, ConfigError> {
    let config: CrushConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are in range.
fn validate_config(config: &CrushConfig) -> Result<(), ConfigError> {
    if config.paths.public_dir.is_empty() {
        return Err(ConfigError::MissingField("paths.public_dir".to_string()));
    }
    if config.paths.cache_dir.trim_matches('/').is_empty() {
        return Err(ConfigError::MissingField("paths.cache_dir".to_string()));
    }
    if config.closure.host.is_empty() {
        return Err(ConfigError::MissingField("closure.host".to_string()));
    }
    if config.closure.port == 0 {
        return Err(ConfigError::ValidationError(
            "closure.port must be non-zero".to_string(),
        ));
    }
    if !config.closure.path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "closure.path must start with '/', got '{}'",
            config.closure.path
        )));
    }
    // timeout_secs must be in [1, 600]
    if config.closure.timeout_secs == 0 || config.closure.timeout_secs > 600 {
        return Err(ConfigError::ValidationError(format!(
            "closure.timeout_secs must be between 1 and 600, got {}",
            config.closure.timeout_secs
        )));
    }
    Ok(())
}
