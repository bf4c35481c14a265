//! Model Context Protocol (MCP) tools for the Thunder Client CLI.
//!
//! The crate is layered bottom-up:
//!
//! - [`adapter`] builds `tc` command lines and runs them in a project
//!   directory, folding every outcome into an [`InvocationResult`].
//! - [`registry`] maps tool names to declarative input contracts and
//!   handlers, validating arguments before any command runs.
//! - [`server`] exposes the registry over MCP using `rmcp`.
//! - [`config`] loads the optional JSON configuration file.

pub mod adapter;
pub mod config;
pub mod registry;
pub mod server;
pub mod types;

pub use adapter::{CommandAdapter, CommandBuilder, CommandLine, RecordRequest, ShellAdapter};
pub use config::{ConfigError, PlatformSetting, ServerConfig, load_config, load_config_from_path};
pub use registry::{OperationContract, OperationRegistry, OperationSummary};
pub use server::{ThunderMcpCore, serve_stdio};
pub use types::{FailureKind, InvocationResult, OperationError, RegistryError, ValidationError, ViolatedRule};
