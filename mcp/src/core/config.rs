//! Gateway configuration.

use std::{fmt, time::Duration};

use super::retry::RetryPolicy;
use crate::error::{GatewayError, GatewayResult};

pub const DEFAULT_BASE_URL: &str = "https://api.airtable.com";

/// Default TTL shared by the bases and schema caches (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub struct GatewayConfig {
    /// Bearer credential forwarded on every request.
    pub api_key: String,
    pub base_url: String,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
    /// Connect timeout for the underlying HTTP client.
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    /// Build a config with defaults. The key is trimmed; a blank key is rejected.
    pub fn new(api_key: impl AsRef<str>) -> GatewayResult<Self> {
        let api_key = api_key.as_ref().trim().to_string();
        if api_key.is_empty() {
            return Err(GatewayError::Config(
                "No API key provided. Set it in the `AIRTABLE_API_KEY` environment variable"
                    .to_string(),
            ));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL,
            retry: RetryPolicy::default(),
            connect_timeout: Duration::from_secs(10),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"****")
            .field("base_url", &self.base_url)
            .field("cache_ttl", &self.cache_ttl)
            .field("retry", &self.retry)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
