//! Configuration IO helpers.

use crate::config::{ConfigError, ServerConfig};
use dirs_next::config_dir;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thunder_mcp_util::expand_tilde;

/// Environment variable that overrides the configuration file location.
pub const CONFIG_PATH_ENV: &str = "THUNDER_MCP_CONFIG";

/// Returns the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("thunder-mcp").join("config.json")
}

/// Loads configuration from the default path.
pub fn load_config() -> Result<ServerConfig, ConfigError> {
    let path = default_config_path();
    load_config_from_path(&path)
}

/// Loads configuration from a specific path; a missing file yields defaults.
pub fn load_config_from_path(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        return Ok(ServerConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config: ServerConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
