//! Data models for the server configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use thunder_mcp_util::ShellFlavor;

/// How the Thunder Client CLI is located and invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ServerConfig {
    /// Program name or path of the CLI, resolved through `PATH` by the shell.
    pub program: String,
    /// Subcommand that records a curl request into a collection.
    pub record_subcommand: String,
    pub help_flag: String,
    pub debug_flag: String,
    /// Workspace selection placed right after the curl arguments; empty omits it.
    pub workspace_flag: String,
    /// Appended to every record invocation so the CLI can tell agent traffic
    /// apart from a human at a terminal.
    pub marker_flag: String,
    /// Upper bound for a single invocation. `None` waits for the CLI to exit.
    pub timeout_secs: Option<u64>,
    /// Shell family used to quote and launch commands.
    pub platform: PlatformSetting,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            program: "tc".to_string(),
            record_subcommand: "curl".to_string(),
            help_flag: "--help".to_string(),
            debug_flag: "--debug".to_string(),
            workspace_flag: "--ws .".to_string(),
            marker_flag: "--mcp".to_string(),
            timeout_secs: None,
            platform: PlatformSetting::Auto,
        }
    }
}

impl ServerConfig {
    /// The shell flavor commands are built for.
    pub fn shell_flavor(&self) -> ShellFlavor {
        match self.platform {
            PlatformSetting::Auto => ShellFlavor::host(),
            PlatformSetting::Posix => ShellFlavor::Posix,
            PlatformSetting::Windows => ShellFlavor::Windows,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Reject values that would produce a malformed command line.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("program", &self.program),
            ("recordSubcommand", &self.record_subcommand),
            ("helpFlag", &self.help_flag),
            ("debugFlag", &self.debug_flag),
            ("markerFlag", &self.marker_flag),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(format!("'{key}' must not be empty")));
            }
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::invalid("'timeoutSecs' must be greater than zero"));
        }
        Ok(())
    }
}

/// Shell family selection; `auto` follows the host operating system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSetting {
    #[default]
    Auto,
    Posix,
    Windows,
}

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let json = r#"{ "program": "/opt/tc/bin/tc", "timeoutSecs": 30, "platform": "windows" }"#;
        let config: ServerConfig = serde_json::from_str(json).expect("config deserializes");
        assert_eq!(config.program, "/opt/tc/bin/tc");
        assert_eq!(config.record_subcommand, "curl");
        assert_eq!(config.workspace_flag, "--ws .");
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.shell_flavor(), ShellFlavor::Windows);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<ServerConfig>(r#"{ "programme": "tc" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn validation_rejects_blank_flags_and_zero_timeout() {
        let blank = ServerConfig {
            marker_flag: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().unwrap_err().to_string().contains("markerFlag"));

        let zero = ServerConfig {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());
        assert!(ServerConfig::default().validate().is_ok());
    }
}
