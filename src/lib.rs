//! Airtable MCP server: command line configuration, logging and transports.
//!
//! The tool layer and Airtable gateway live in the `airtable-mcp` crate.

pub mod config;
pub mod logging;
pub mod server;
