//! Airtable gateway and MCP tool layer.
//!
//! ## Modules
//!
//! - [`core`]: HTTP gateway, TTL schema cache, retry policy, config, metrics
//! - [`service`]: the [`AirtableService`] trait the tool layer depends on
//! - [`views`]: name-or-id resolution and view definition checks
//! - [`classify`]: outward error codes for failed tool calls
//! - [`tools`]: tool catalog and the [`ToolDispatcher`]
//! - [`resources`]: table schemas as MCP resources

// Shared types
pub mod annotations;
pub mod error;
pub mod types;

// Subsystems
pub mod classify;
pub mod core;
pub mod resources;
pub mod service;
pub mod tools;
pub mod views;

#[cfg(test)]
mod test_support;

pub use annotations::ToolAnnotations;
pub use classify::{classify, ErrorCode, StructuredError, ToolFailure};
pub use crate::core::{
    AirtableClient, GatewayConfig, GatewayMetrics, LatencySnapshot, MetricsSnapshot, RetryPolicy,
    SchemaCache,
};
pub use error::{GatewayError, GatewayResult};
pub use resources::{list_resources, read_resource, ResourceContent, ResourceDescriptor};
pub use service::AirtableService;
pub use tools::{tool_definitions, ToolDefinition, ToolDispatcher, ToolName, ToolResult};
