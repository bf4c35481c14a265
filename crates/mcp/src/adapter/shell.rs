//! Runs assembled command lines through the host shell.

use crate::adapter::{CommandAdapter, CommandBuilder, CommandLine};
use crate::config::ServerConfig;
use crate::types::{FailureKind, InvocationResult};
use std::io;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use thunder_mcp_util::{ShellFlavor, quote_cmd_command_line};
use tokio::process::Command;

/// Production adapter: one `sh -c` / `cmd /S /C` child per invocation.
#[derive(Debug, Clone)]
pub struct ShellAdapter {
    commands: CommandBuilder,
    timeout: Option<Duration>,
}

impl ShellAdapter {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            commands: CommandBuilder::from_config(config),
            timeout: config.timeout(),
        }
    }
}

#[async_trait::async_trait]
impl CommandAdapter for ShellAdapter {
    fn commands(&self) -> &CommandBuilder {
        &self.commands
    }

    async fn execute(&self, command: &CommandLine, working_directory: &Path) -> InvocationResult {
        let mut process = shell_command(self.commands.flavor(), command.as_str());
        // stdin and stdout of this process carry the MCP stream; the child gets neither.
        process
            .current_dir(working_directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::info!(command = %command, directory = %working_directory.display(), "running Thunder Client CLI");

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, process.output()).await {
                Ok(output) => output,
                Err(_) => {
                    tracing::warn!(command = %command, timeout_secs = limit.as_secs(), "command timed out");
                    return InvocationResult::failed(
                        FailureKind::Timeout,
                        format!("Command timed out after {}s: {command}", limit.as_secs()),
                    );
                }
            },
            None => process.output().await,
        };

        normalize_output(command, output)
    }
}

fn shell_command(flavor: ShellFlavor, line: &str) -> Command {
    match flavor {
        ShellFlavor::Posix => {
            let mut command = Command::new("sh");
            command.arg("-c").arg(line);
            command
        }
        ShellFlavor::Windows => {
            let mut command = Command::new("cmd");
            command.args(["/D", "/S", "/C"]);
            let argument = quote_cmd_command_line(line);
            // cmd.exe parses its own command line; the quoting must reach it verbatim.
            #[cfg(windows)]
            command.raw_arg(argument);
            #[cfg(not(windows))]
            command.arg(argument);
            command
        }
    }
}

/// Folds a finished (or failed-to-start) process into the uniform result.
///
/// Exit status zero is authoritative for success. On failure the reason is
/// stderr when non-empty, else stdout when it mentions "error", else a local
/// description of the exit status.
pub(crate) fn normalize_output(command: &CommandLine, output: io::Result<Output>) -> InvocationResult {
    let output = match output {
        Ok(output) => output,
        Err(error) => {
            tracing::warn!(command = %command, %error, "failed to start command");
            return InvocationResult::failed(FailureKind::ExecutionFailure, format!("Failed to run `{command}`: {error}"));
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return InvocationResult::succeeded(stdout);
    }

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let reason = if !stderr.trim().is_empty() {
        stderr
    } else if stdout.to_lowercase().contains("error") {
        stdout
    } else {
        format!("Command failed with {}: {command}", output.status)
    };
    tracing::warn!(command = %command, status = %output.status, "command failed");
    InvocationResult::failed(FailureKind::ExecutionFailure, reason)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::PlatformSetting;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn output(code: i32, stdout: &str, stderr: &str) -> io::Result<Output> {
        Ok(Output {
            status: ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        })
    }

    fn adapter(timeout_secs: Option<u64>) -> ShellAdapter {
        ShellAdapter::new(&ServerConfig {
            platform: PlatformSetting::Posix,
            timeout_secs,
            ..Default::default()
        })
    }

    #[test]
    fn zero_exit_returns_stdout() {
        let result = normalize_output(&CommandLine::new("tc --help"), output(0, "Usage: tc", ""));
        assert_eq!(result, InvocationResult::succeeded("Usage: tc"));
    }

    #[test]
    fn zero_exit_is_success_even_when_stdout_mentions_error() {
        let result = normalize_output(&CommandLine::new("tc --help"), output(0, "error codes: 1..9", ""));
        assert!(result.success);
    }

    #[test]
    fn failure_prefers_stderr() {
        let result = normalize_output(&CommandLine::new("tc curl x"), output(1, "Error in stdout", "bad flag"));
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("bad flag"));
        assert_eq!(result.error_kind, Some(FailureKind::ExecutionFailure));
    }

    #[test]
    fn failure_falls_back_to_error_bearing_stdout() {
        let result = normalize_output(&CommandLine::new("tc curl x"), output(2, "ERROR: collection not found", ""));
        assert_eq!(result.error.as_deref(), Some("ERROR: collection not found"));
    }

    #[test]
    fn failure_without_diagnostics_describes_the_exit() {
        let result = normalize_output(&CommandLine::new("tc curl x"), output(3, "nothing useful", ""));
        let error = result.error.unwrap_or_default();
        assert!(error.contains("tc curl x"), "error: {error}");
        assert!(error.contains('3'), "error: {error}");
    }

    #[test]
    fn spawn_failure_is_normalized() {
        let result = normalize_output(
            &CommandLine::new("tc --help"),
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file")),
        );
        assert_eq!(result.error_kind, Some(FailureKind::ExecutionFailure));
        assert!(result.error.unwrap_or_default().contains("no such file"));
    }

    #[tokio::test]
    async fn executes_in_the_working_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("marker.txt"), "").expect("write");
        let result = adapter(None).execute(&CommandLine::new("ls"), dir.path()).await;
        assert!(result.success, "{result:?}");
        assert!(result.result.unwrap_or_default().contains("marker.txt"));
    }

    #[tokio::test]
    async fn missing_program_is_reported_not_raised() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = adapter(None)
            .execute(&CommandLine::new("definitely-not-a-thunder-binary --help"), dir.path())
            .await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(FailureKind::ExecutionFailure));
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = adapter(Some(1)).execute(&CommandLine::new("sleep 5"), dir.path()).await;
        assert_eq!(result.error_kind, Some(FailureKind::Timeout));
    }
}
