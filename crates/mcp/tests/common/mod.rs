#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thunder_mcp_server::{
    CommandAdapter, CommandBuilder, CommandLine, InvocationResult, OperationRegistry, PlatformSetting, ServerConfig,
    ThunderMcpCore,
};

/// Records every command instead of running it, and answers with a canned result.
pub struct RecordingAdapter {
    commands: CommandBuilder,
    reply: InvocationResult,
    calls: Mutex<Vec<(String, PathBuf)>>,
}

impl RecordingAdapter {
    pub fn replying(reply: InvocationResult) -> Arc<Self> {
        let config = ServerConfig {
            platform: PlatformSetting::Posix,
            ..Default::default()
        };
        Arc::new(Self {
            commands: CommandBuilder::from_config(&config),
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait::async_trait]
impl CommandAdapter for RecordingAdapter {
    fn commands(&self) -> &CommandBuilder {
        &self.commands
    }

    async fn execute(&self, command: &CommandLine, working_directory: &Path) -> InvocationResult {
        self.calls
            .lock()
            .expect("calls lock")
            .push((command.to_string(), working_directory.to_path_buf()));
        self.reply.clone()
    }
}

pub fn registry(adapter: Arc<RecordingAdapter>) -> OperationRegistry {
    OperationRegistry::builtin(adapter).expect("builtin registry")
}

pub fn core(adapter: Arc<RecordingAdapter>) -> ThunderMcpCore {
    ThunderMcpCore::new(Arc::new(registry(adapter)))
}

pub fn args(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().expect("object arguments")
}
