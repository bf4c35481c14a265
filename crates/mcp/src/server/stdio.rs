//! MCP over the process's own stdin/stdout.

use anyhow::{Context, Result};
use rmcp::ServiceExt;

use crate::server::core::ThunderMcpCore;

/// Serve `core` on stdio until the client disconnects or a shutdown signal
/// arrives.
///
/// Stdout carries the protocol stream, so logging must go to stderr.
pub async fn serve_stdio(core: ThunderMcpCore) -> Result<()> {
    tracing::info!(tools = core.registry().list().len(), "starting MCP stdio server");

    let service = core
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to initialize MCP session on stdio")?;
    let cancellation = service.cancellation_token();

    tokio::select! {
        quit = service.waiting() => {
            let reason = quit.context("MCP stdio service task failed")?;
            tracing::info!(?reason, "MCP stdio server stopped");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            tracing::info!("received ctrl-c; shutting down MCP stdio server");
            cancellation.cancel();
        }
    }
    Ok(())
}
