//! In-process counters for gateway and tool activity.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Counters for upstream traffic, cache behaviour and tool calls.
pub struct GatewayMetrics {
    // Upstream
    upstream_requests: AtomicU64,
    upstream_retries: AtomicU64,
    upstream_failures: AtomicU64,

    // Cache
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    schema_invalidations: AtomicU64,

    // Tools
    tool_calls: AtomicU64,
    tool_failures: AtomicU64,
    tool_latencies: DashMap<String, LatencyStats>,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self {
            upstream_requests: AtomicU64::new(0),
            upstream_retries: AtomicU64::new(0),
            upstream_failures: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            schema_invalidations: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            tool_failures: AtomicU64::new(0),
            tool_latencies: DashMap::new(),
        }
    }

    /// One HTTP attempt went out. `attempt > 1` counts as a retry.
    pub fn record_upstream_attempt(&self, attempt: u32) {
        self.upstream_requests.fetch_add(1, Ordering::Relaxed);
        if attempt > 1 {
            self.upstream_retries.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_schema_invalidation(&self) {
        self.schema_invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished tool call.
    pub fn record_tool_call(&self, tool: &str, success: bool, duration_ms: u64) {
        self.tool_calls.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.tool_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.tool_latencies
            .entry(tool.to_string())
            .or_insert_with(LatencyStats::new)
            .record(duration_ms);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            upstream_requests: self.upstream_requests.load(Ordering::Relaxed),
            upstream_retries: self.upstream_retries.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            schema_invalidations: self.schema_invalidations.load(Ordering::Relaxed),
            tool_calls: self.tool_calls.load(Ordering::Relaxed),
            tool_failures: self.tool_failures.load(Ordering::Relaxed),
        }
    }

    pub fn tool_latency(&self, tool: &str) -> Option<LatencySnapshot> {
        self.tool_latencies.get(tool).map(|stats| stats.snapshot())
    }
}

impl Default for GatewayMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-tool latency statistics.
pub struct LatencyStats {
    count: AtomicU64,
    total_ms: AtomicU64,
    min_ms: AtomicU64,
    max_ms: AtomicU64,
}

impl LatencyStats {
    fn new() -> Self {
        Self {
            count: AtomicU64::new(0),
            total_ms: AtomicU64::new(0),
            min_ms: AtomicU64::new(u64::MAX),
            max_ms: AtomicU64::new(0),
        }
    }

    fn record(&self, ms: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_ms.fetch_add(ms, Ordering::Relaxed);
        self.min_ms.fetch_min(ms, Ordering::Relaxed);
        self.max_ms.fetch_max(ms, Ordering::Relaxed);
    }

    fn snapshot(&self) -> LatencySnapshot {
        let count = self.count.load(Ordering::Relaxed);
        let total = self.total_ms.load(Ordering::Relaxed);
        let min = self.min_ms.load(Ordering::Relaxed);

        LatencySnapshot {
            count,
            avg_ms: if count > 0 { total / count } else { 0 },
            min_ms: if min == u64::MAX { 0 } else { min },
            max_ms: self.max_ms.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub upstream_requests: u64,
    pub upstream_retries: u64,
    pub upstream_failures: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub schema_invalidations: u64,
    pub tool_calls: u64,
    pub tool_failures: u64,
}

impl MetricsSnapshot {
    /// Cache hit rate as a percentage.
    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / lookups as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencySnapshot {
    pub count: u64,
    pub avg_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}
