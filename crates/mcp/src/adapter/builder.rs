//! Command-line assembly for the Thunder Client CLI.

use crate::config::ServerConfig;
use std::fmt;
use thunder_mcp_util::{ShellFlavor, normalize_data_payloads, quote_flag_value};

/// A fully assembled shell command line, alive for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine(String);

impl CommandLine {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inputs of a record invocation, already validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordRequest<'a> {
    /// Everything after the leading `curl ` token, passed through untouched
    /// apart from data-flag quoting.
    pub curl_args: &'a str,
    pub name: Option<&'a str>,
    pub collection: Option<&'a str>,
    pub folder: Option<&'a str>,
}

/// Builds the three command forms the server issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    program: String,
    record_subcommand: String,
    help_flag: String,
    debug_flag: String,
    workspace_flag: String,
    marker_flag: String,
    flavor: ShellFlavor,
}

impl CommandBuilder {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            program: config.program.trim().to_string(),
            record_subcommand: config.record_subcommand.trim().to_string(),
            help_flag: config.help_flag.trim().to_string(),
            debug_flag: config.debug_flag.trim().to_string(),
            workspace_flag: config.workspace_flag.trim().to_string(),
            marker_flag: config.marker_flag.trim().to_string(),
            flavor: config.shell_flavor(),
        }
    }

    pub fn flavor(&self) -> ShellFlavor {
        self.flavor
    }

    pub fn help(&self) -> CommandLine {
        CommandLine(format!("{} {}", self.program_token(), self.help_flag))
    }

    pub fn debug(&self) -> CommandLine {
        CommandLine(format!("{} {}", self.program_token(), self.debug_flag))
    }

    /// `<program> <record> <args> [<workspace>] [--name "n"] [--col "c"] [--fol "f"] <marker>`
    pub fn build_record(&self, request: &RecordRequest<'_>) -> CommandLine {
        let mut parts = vec![self.program_token(), self.record_subcommand.clone()];

        let curl_args = normalize_data_payloads(request.curl_args.trim(), self.flavor);
        if !curl_args.is_empty() {
            parts.push(curl_args);
        }
        if !self.workspace_flag.is_empty() {
            parts.push(self.workspace_flag.clone());
        }

        let optional_flags = [("--name", request.name), ("--col", request.collection), ("--fol", request.folder)];
        for (flag, value) in optional_flags {
            if let Some(value) = value {
                parts.push(format!("{flag} {}", quote_flag_value(value, self.flavor)));
            }
        }

        parts.push(self.marker_flag.clone());
        CommandLine(parts.join(" "))
    }

    fn program_token(&self) -> String {
        if self.program.chars().any(char::is_whitespace) {
            quote_flag_value(&self.program, self.flavor)
        } else {
            self.program.clone()
        }
    }
}
