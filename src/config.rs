//! Command line and environment configuration.

use std::time::Duration;

use airtable_mcp::{core::DEFAULT_BASE_URL, GatewayConfig, GatewayResult};
use clap::{builder::BoolishValueParser, Parser};

/// Secondary environment variable consulted for the credential.
pub const PAT_ENV: &str = "AIRTABLE_PAT";

#[derive(Debug, Clone, Parser)]
#[command(name = "airtable-mcp-server", version, about = "Airtable MCP server")]
pub struct ServerArgs {
    /// Deprecated: set AIRTABLE_API_KEY instead
    #[arg(value_name = "API_KEY", hide = true)]
    pub positional_api_key: Option<String>,

    /// Airtable personal access token
    #[arg(long, env = "AIRTABLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "AIRTABLE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Schema cache TTL in milliseconds
    #[arg(long, env = "SCHEMA_CACHE_TTL_MS", default_value_t = 300_000)]
    pub cache_ttl_ms: u64,

    /// Serve MCP over HTTP on this port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Also serve stdio when HTTP is enabled
    #[arg(long, env = "STDIO_MODE", value_parser = BoolishValueParser::new())]
    pub stdio: bool,

    #[arg(long, env = "ENABLE_CORS", value_parser = BoolishValueParser::new())]
    pub enable_cors: bool,

    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    pub allowed_origins: String,

    /// Skip the startup connectivity check
    #[arg(long, env = "SKIP_PREFLIGHT", value_parser = BoolishValueParser::new())]
    pub skip_preflight: bool,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_JSON", value_parser = BoolishValueParser::new())]
    pub log_json: bool,
}

/// Options for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub port: u16,
    pub enable_cors: bool,
    pub allowed_origins: String,
}

impl ServerArgs {
    pub fn uses_positional_key(&self) -> bool {
        self.positional_api_key.is_some()
    }

    /// Pick the credential: flag or `AIRTABLE_API_KEY`, then `pat_env`, then the positional key.
    pub fn resolve_api_key(&self, pat_env: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or(pat_env)
            .or_else(|| self.positional_api_key.clone())
    }

    pub fn gateway_config(&self, pat_env: Option<String>) -> GatewayResult<GatewayConfig> {
        let api_key = self.resolve_api_key(pat_env).unwrap_or_default();
        Ok(GatewayConfig::new(api_key)?
            .with_base_url(self.base_url.clone())
            .with_cache_ttl(Duration::from_millis(self.cache_ttl_ms)))
    }

    pub fn http_options(&self) -> Option<HttpOptions> {
        self.port.map(|port| HttpOptions {
            port,
            enable_cors: self.enable_cors,
            allowed_origins: self.allowed_origins.clone(),
        })
    }

    /// stdio runs when HTTP is off, or alongside it when requested.
    pub fn runs_stdio(&self) -> bool {
        self.port.is_none() || self.stdio
    }
}
