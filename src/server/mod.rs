//! MCP transports over a shared [`McpServer`].
//!
//! - [`stdio`]: rmcp `ServerHandler` on stdin/stdout
//! - [`http`]: JSON-RPC over axum with session headers and SSE framing
//! - [`session`]: session table for the HTTP transport

pub mod http;
pub mod session;
pub mod stdio;

use std::sync::Arc;

use airtable_mcp::{
    list_resources, read_resource, AirtableService, GatewayResult, ResourceContent,
    ResourceDescriptor, ToolDefinition, ToolDispatcher, ToolResult,
};
use serde_json::{json, Value};
use tracing::{info, warn};

pub const SERVER_NAME: &str = "airtable-mcp-server";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Transport-independent MCP surface.
#[derive(Clone)]
pub struct McpServer {
    dispatcher: Arc<ToolDispatcher>,
}

impl McpServer {
    pub fn new(dispatcher: Arc<ToolDispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Arc<ToolDispatcher> {
        &self.dispatcher
    }

    pub fn tools(&self) -> Vec<ToolDefinition> {
        self.dispatcher.definitions()
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolResult {
        self.dispatcher.dispatch(name, arguments).await
    }

    pub async fn list_resources(&self) -> GatewayResult<Vec<ResourceDescriptor>> {
        list_resources(self.dispatcher.service().as_ref()).await
    }

    pub async fn read_resource(&self, uri: &str) -> GatewayResult<ResourceContent> {
        read_resource(self.dispatcher.service().as_ref(), uri).await
    }
}

/// Wire form of a catalog entry for `tools/list`.
pub fn tool_descriptor(definition: &ToolDefinition) -> Value {
    let annotations = &definition.annotations;
    json!({
        "name": definition.name.as_ref(),
        "description": definition.description,
        "inputSchema": definition.input_schema,
        "annotations": {
            "readOnlyHint": annotations.read_only,
            "destructiveHint": annotations.destructive,
            "idempotentHint": annotations.idempotent,
            "openWorldHint": annotations.open_world,
        },
    })
}

/// List bases and read the first base's schema to confirm token scopes.
pub async fn preflight(service: &dyn AirtableService) -> GatewayResult<()> {
    info!("Running preflight checks");
    let bases = service.list_bases().await?;
    match bases.bases.first() {
        Some(first) => {
            service.get_base_schema(&first.id).await?;
        }
        None => warn!("No accessible bases found for provided Airtable token"),
    }
    info!("Preflight checks passed");
    Ok(())
}
