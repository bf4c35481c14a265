use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thunder_mcp_server::{
    OperationRegistry, ServerConfig, ShellAdapter, ThunderMcpCore, load_config, load_config_from_path, serve_stdio,
};
use tracing_subscriber::EnvFilter;

/// MCP server exposing the Thunder Client CLI (`tc`) as tools.
#[derive(Debug, Parser)]
#[command(name = "thunder-mcp", version, about)]
struct Cli {
    /// Path to a JSON config file (defaults to $THUNDER_MCP_CONFIG or the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Thunder Client CLI executable to run.
    #[arg(long, global = true)]
    program: Option<String>,

    /// Kill a CLI invocation after this many seconds.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve MCP over stdin/stdout (default).
    Serve,
    /// Print the tool catalog.
    Tools {
        /// Print name, description and input schema as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Invoke one tool locally and print its result.
    Call {
        /// Tool name, for example `tc_help`.
        name: String,
        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let adapter = Arc::new(ShellAdapter::new(&config));
    let registry = OperationRegistry::builtin(adapter).context("failed to build operation registry")?;
    let core = ThunderMcpCore::new(Arc::new(registry));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve_stdio(core).await,
        Command::Tools { json } => print_tools(&core, json),
        Command::Call { name, args } => call_tool(&core, &name, &args).await,
    }
}

/// Logs go to stderr; stdout is reserved for the MCP stream.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path).with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };
    if let Some(program) = &cli.program {
        config.program = program.clone();
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = Some(timeout_secs);
    }
    config.validate().context("invalid configuration")?;
    tracing::debug!(program = %config.program, timeout_secs = ?config.timeout_secs, "configuration resolved");
    Ok(config)
}

fn print_tools(core: &ThunderMcpCore, json: bool) -> Result<()> {
    let summaries = core.registry().list();
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in summaries {
        let headline = summary.description.lines().next().unwrap_or_default();
        println!("{:<10} {headline}", summary.name);
    }
    Ok(())
}

async fn call_tool(core: &ThunderMcpCore, name: &str, raw_args: &str) -> Result<()> {
    let value: serde_json::Value = serde_json::from_str(raw_args).context("--args must be valid JSON")?;
    let arguments = value.as_object().context("--args must be a JSON object")?;
    let result = core
        .registry()
        .invoke(name, Some(arguments))
        .await
        .with_context(|| format!("Error calling tool {name}"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    anyhow::ensure!(result.is_success(), "tool {name} reported failure");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use thunder_mcp_server::PlatformSetting;

    fn core_running(program: &str) -> ThunderMcpCore {
        let config = ServerConfig {
            program: program.to_string(),
            platform: PlatformSetting::Posix,
            ..Default::default()
        };
        let registry = OperationRegistry::builtin(Arc::new(ShellAdapter::new(&config))).expect("registry");
        ThunderMcpCore::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn failed_call_is_returned_as_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = serde_json::json!({ "projectDir": dir.path() }).to_string();

        let error = call_tool(&core_running("false"), "tc_help", &args).await.unwrap_err();

        assert!(error.to_string().contains("tc_help"), "{error}");
    }

    #[tokio::test]
    async fn successful_call_returns_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = serde_json::json!({ "projectDir": dir.path() }).to_string();

        assert!(call_tool(&core_running("true"), "tc_help", &args).await.is_ok());
    }

    #[test]
    fn command_line_overrides_file_settings() {
        let cli = Cli::parse_from(["thunder-mcp", "--config", "/nonexistent/config.json", "--program", "tc2", "--timeout-secs", "9"]);
        let config = resolve_config(&cli).expect("config");
        assert_eq!(config.program, "tc2");
        assert_eq!(config.timeout_secs, Some(9));
    }
}
