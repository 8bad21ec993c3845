//! stdio transport backed by rmcp.

use std::{borrow::Cow, sync::Arc};

use airtable_mcp::{GatewayError, ToolDefinition, ToolResult};
use rmcp::{
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, Content, Implementation,
        ListResourcesResult, ListToolsResult, PaginatedRequestParam, RawResource,
        ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
        ServerInfo, Tool, ToolAnnotations as RmcpToolAnnotations,
    },
    service::RequestContext,
    transport::stdio,
    ErrorData, RoleServer, ServerHandler, ServiceExt,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::{McpServer, SERVER_NAME, SERVER_VERSION};

pub fn to_rmcp_tool(definition: &ToolDefinition) -> Tool {
    let schema = match &definition.input_schema {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let annotations = definition.annotations;
    Tool {
        name: Cow::Borrowed(definition.name.into()),
        title: None,
        description: Some(Cow::Borrowed(definition.description)),
        input_schema: Arc::new(schema),
        output_schema: None,
        annotations: Some(RmcpToolAnnotations {
            title: None,
            read_only_hint: Some(annotations.read_only),
            destructive_hint: Some(annotations.destructive),
            idempotent_hint: Some(annotations.idempotent),
            open_world_hint: Some(annotations.open_world),
        }),
        icons: None,
    }
}

pub fn to_call_tool_result(result: ToolResult) -> CallToolResult {
    let content = result
        .content
        .into_iter()
        .map(|block| Content::text(block.text))
        .collect();
    if result.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn to_error_data(err: GatewayError) -> ErrorData {
    match err {
        GatewayError::Validation(msg) => ErrorData::invalid_params(msg, None),
        GatewayError::NotFound(msg) | GatewayError::LookupMiss(msg) => {
            ErrorData::resource_not_found(msg, None)
        }
        other => ErrorData::internal_error(other.to_string(), None),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                title: Some("Airtable".to_string()),
                version: SERVER_VERSION.to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read and write Airtable bases, tables, records, fields and views. \
                 Table schemas are available as airtable://{baseId}/{tableId}/schema resources."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        debug!("Handling list_tools request");
        let tools = self.tools().iter().map(to_rmcp_tool).collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = Value::Object(request.arguments.unwrap_or_default());
        let result = McpServer::call_tool(self, &request.name, arguments).await;
        Ok(to_call_tool_result(result))
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        let resources = McpServer::list_resources(self)
            .await
            .map_err(to_error_data)?
            .into_iter()
            .map(|descriptor| {
                RawResource {
                    uri: descriptor.uri,
                    name: descriptor.name,
                    title: None,
                    description: None,
                    mime_type: Some(descriptor.mime_type),
                    size: None,
                    icons: None,
                }
                .no_annotation()
            })
            .collect();
        Ok(ListResourcesResult::with_all_items(resources))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        let content = McpServer::read_resource(self, &request.uri)
            .await
            .map_err(to_error_data)?;
        let contents: ResourceContents = serde_json::to_value(&content)
            .and_then(serde_json::from_value)
            .map_err(|e| ErrorData::internal_error(e.to_string(), None))?;
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

/// Serve MCP on stdin/stdout until the peer disconnects.
pub async fn serve_stdio(server: McpServer) -> anyhow::Result<()> {
    info!("Starting stdio transport");
    let running = server.serve(stdio()).await?;
    let reason = running.waiting().await?;
    info!(?reason, "stdio transport closed");
    Ok(())
}
