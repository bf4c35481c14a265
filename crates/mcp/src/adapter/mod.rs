//! The command adapter: the single seam between validated operation input and
//! the external Thunder Client CLI.

mod builder;
mod shell;

pub use builder::{CommandBuilder, CommandLine, RecordRequest};
pub use shell::ShellAdapter;

use crate::types::InvocationResult;
use std::path::Path;

/// Turns one structured request into exactly one CLI invocation.
///
/// Implementations never retry and never fail past [`InvocationResult`].
#[async_trait::async_trait]
pub trait CommandAdapter: Send + Sync {
    /// Builder for the help, debug and record command lines.
    fn commands(&self) -> &CommandBuilder;

    /// Whether `path` is an existing directory right now. Not cached.
    fn check_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Run `command` in `working_directory` and wait for it to exit.
    async fn execute(&self, command: &CommandLine, working_directory: &Path) -> InvocationResult;
}
