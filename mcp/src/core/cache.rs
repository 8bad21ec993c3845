//! TTL read-through cache for the bases list and per-base schemas.
//!
//! Both regions share one TTL. Entries are written once with a fixed expiry and
//! never extended. Concurrent misses on the same key are not coalesced: each
//! caller fetches and the last write wins.

use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::debug;

use super::metrics::GatewayMetrics;
use crate::{
    error::GatewayResult,
    types::{BaseList, BaseSchema},
};

struct CacheEntry<T> {
    data: Arc<T>,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: Arc<T>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn live_data(&self, now: Instant) -> Option<Arc<T>> {
        (now < self.expires_at).then(|| Arc::clone(&self.data))
    }
}

pub struct SchemaCache {
    ttl: Duration,
    bases: Mutex<Option<CacheEntry<BaseList>>>,
    schemas: DashMap<String, CacheEntry<BaseSchema>>,
    metrics: Arc<GatewayMetrics>,
}

impl SchemaCache {
    pub fn new(ttl: Duration, metrics: Arc<GatewayMetrics>) -> Self {
        Self {
            ttl,
            bases: Mutex::new(None),
            schemas: DashMap::new(),
            metrics,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached bases list, or the result of `fetch` stored for one TTL.
    pub async fn bases_or_fetch<F, Fut>(&self, fetch: F) -> GatewayResult<Arc<BaseList>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GatewayResult<BaseList>>,
    {
        let cached = self
            .bases
            .lock()
            .as_ref()
            .and_then(|entry| entry.live_data(Instant::now()));
        if let Some(data) = cached {
            self.metrics.record_cache_hit();
            return Ok(data);
        }

        self.metrics.record_cache_miss();
        let data = Arc::new(fetch().await?);
        *self.bases.lock() = Some(CacheEntry::new(Arc::clone(&data), self.ttl));
        debug!(count = data.bases.len(), "Cached bases list");
        Ok(data)
    }

    /// Cached schema for `base_id`, or the result of `fetch` stored for one TTL.
    pub async fn schema_or_fetch<F, Fut>(
        &self,
        base_id: &str,
        fetch: F,
    ) -> GatewayResult<Arc<BaseSchema>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = GatewayResult<BaseSchema>>,
    {
        let cached = self
            .schemas
            .get(base_id)
            .and_then(|entry| entry.live_data(Instant::now()));
        if let Some(data) = cached {
            self.metrics.record_cache_hit();
            return Ok(data);
        }

        self.metrics.record_cache_miss();
        let data = Arc::new(fetch().await?);
        self.schemas.insert(
            base_id.to_string(),
            CacheEntry::new(Arc::clone(&data), self.ttl),
        );
        debug!(base_id, tables = data.tables.len(), "Cached base schema");
        Ok(data)
    }

    /// Drop the schema entry for `base_id`. Returns whether one existed.
    pub fn invalidate_schema(&self, base_id: &str) -> bool {
        self.metrics.record_schema_invalidation();
        let removed = self.schemas.remove(base_id).is_some();
        debug!(base_id, removed, "Invalidated base schema");
        removed
    }

    pub fn has_live_schema(&self, base_id: &str) -> bool {
        self.schemas
            .get(base_id)
            .and_then(|entry| entry.live_data(Instant::now()))
            .is_some()
    }
}
