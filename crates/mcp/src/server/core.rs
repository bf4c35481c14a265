//! rmcp front-end: advertises the registry as MCP tools and dispatches calls.

use crate::registry::{OperationRegistry, OperationSummary};
use crate::types::{InvocationResult, OperationError};
use futures_util::FutureExt;
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData as McpError, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::{ServerHandler, service::RequestContext};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

const SERVER_INSTRUCTIONS: &str = "Thunder Client tools for saving and inspecting HTTP requests.\nTOOLS:\n- tc_help: show the Thunder Client CLI help.\n- tc_debug: run the Thunder Client CLI in debug mode.\n- tc_curl: save a curl command as a Thunder Client request.\nARGUMENTS:\n- projectDir is always the full absolute path of the current project; never \".\" or \"/\".\n- curlInput must start with \"curl \".\n- folder requires collection. Existing collections live under the project's thunder-tests folder.\nRESULTS:\n- Every tool returns JSON {success, result?, error?}; check success before using result.";

/// Shared, cloneable server state handed to the rmcp service.
#[derive(Clone, Debug)]
pub struct ThunderMcpCore {
    registry: Arc<OperationRegistry>,
}

impl ThunderMcpCore {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// The registry's operations as MCP tool descriptors.
    pub fn tools(&self) -> Vec<Tool> {
        self.registry.list().into_iter().map(tool_from_summary).collect()
    }

    /// Run one tool call to completion. Never fails; every failure becomes an
    /// error-flagged [`CallToolResult`].
    pub async fn dispatch(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        let outcome = AssertUnwindSafe(self.registry.invoke(name, arguments)).catch_unwind().await;
        match outcome {
            Ok(Ok(result)) => invocation_response(&result),
            Ok(Err(error)) => {
                tracing::info!(tool = name, kind = %error.kind(), %error, "tool call rejected");
                rejection_response(name, &error)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(tool = name, %message, "tool handler panicked");
                CallToolResult::error(vec![Content::text(format!("Error calling tool {name}: {message}"))])
            }
        }
    }
}

fn tool_from_summary(summary: OperationSummary) -> Tool {
    Tool::new(summary.name, summary.description, Arc::new(summary.input_schema))
}

/// Serialize the result both as pretty text and as structured content.
fn invocation_response(result: &InvocationResult) -> CallToolResult {
    let value = match serde_json::to_value(result) {
        Ok(value) => value,
        Err(error) => {
            return CallToolResult::error(vec![Content::text(format!("Failed to serialize result: {error}"))]);
        }
    };
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    let mut response = if result.success {
        CallToolResult::success(vec![Content::text(text)])
    } else {
        CallToolResult::error(vec![Content::text(text)])
    };
    response.structured_content = Some(value);
    response
}

fn rejection_response(name: &str, error: &OperationError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error calling tool {name}: {error}"))])
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

impl ServerHandler for ThunderMcpCore {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move { Ok(self.dispatch(&request.name, request.arguments.as_ref()).await) }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "thunder-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Thunder Client MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}
