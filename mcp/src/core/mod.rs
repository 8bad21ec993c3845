//! Gateway infrastructure: HTTP client, cache, retry, config and metrics.

pub mod cache;
pub mod client;
pub mod config;
pub mod metrics;
pub mod retry;
pub mod search;

pub use cache::SchemaCache;
pub use client::{view_request_body, AirtableClient};
pub use config::{GatewayConfig, DEFAULT_BASE_URL, DEFAULT_CACHE_TTL};
pub use metrics::{GatewayMetrics, LatencySnapshot, MetricsSnapshot};
pub use retry::RetryPolicy;
