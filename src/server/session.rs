//! HTTP session table.
//!
//! Sessions are created on `initialize`, refreshed on every request and
//! evicted by a periodic sweep once idle longer than the idle limit.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_IDLE_LIMIT: Duration = Duration::from_secs(24 * 60 * 60);
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    created_at: Instant,
    last_used: Instant,
}

pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    idle_limit: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::with_idle_limit(SESSION_IDLE_LIMIT)
    }

    pub fn with_idle_limit(idle_limit: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_limit,
        }
    }

    /// Register a new session and return its id.
    pub fn create(&self) -> String {
        let id = format!("session_{}", Uuid::new_v4().simple());
        let now = Instant::now();
        self.sessions.insert(
            id.clone(),
            SessionEntry {
                created_at: now,
                last_used: now,
            },
        );
        debug!(session_id = %id, "Created session");
        id
    }

    /// Mark `id` as used. Returns false for an unknown session.
    pub fn touch(&self, id: &str) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                entry.last_used = Instant::now();
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Age of a session since creation.
    pub fn age(&self, id: &str) -> Option<Duration> {
        self.sessions.get(id).map(|e| e.created_at.elapsed())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle longer than the limit. Returns how many were removed.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let limit = self.idle_limit;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.duration_since(entry.last_used) <= limit);
        before.saturating_sub(self.sessions.len())
    }

    /// Run [`evict_idle`](Self::evict_idle) every `interval` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle();
                if evicted > 0 {
                    debug!(evicted, remaining = self.len(), "Swept idle sessions");
                }
            }
        })
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
