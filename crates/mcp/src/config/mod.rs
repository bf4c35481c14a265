//! Configuration management for the Thunder Client MCP server.
//! This module handles parsing and validation of the
//! ~/.config/thunder-mcp/config.json configuration file.

mod io;
mod model;

pub use io::{CONFIG_PATH_ENV, default_config_path, load_config, load_config_from_path};
pub use model::{ConfigError, PlatformSetting, ServerConfig};
