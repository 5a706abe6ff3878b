//! Shared session-context store.
//!
//! Process-wide map from session id to [`SessionContext`], shared by the
//! tool facade across concurrent callers. Each entry sits behind its own
//! mutex (single-writer-per-key); entries are created on first write and
//! swept once they sit idle past the TTL. State is transient — a process
//! restart clears it.

use crate::context::SessionContext;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

/// Concurrent session-context store with per-key locking.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<SessionContext>>>>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot a session's context, if it exists.
    pub async fn get(&self, session_id: &str) -> Option<SessionContext> {
        let entry = {
            let map = self.inner.read().await;
            map.get(session_id).cloned()
        };
        match entry {
            Some(entry) => Some(entry.lock().await.clone()),
            None => None,
        }
    }

    /// Replace a session's context wholesale (last write wins).
    pub async fn put(&self, session_id: &str, context: SessionContext) {
        let entry = self.entry(session_id).await;
        let mut guard = entry.lock().await;
        *guard = context;
        guard.touch();
    }

    /// Mutate a session's context under its key lock, creating the
    /// entry on first write.
    pub async fn update<F>(&self, session_id: &str, mutate: F)
    where
        F: FnOnce(&mut SessionContext),
    {
        let entry = self.entry(session_id).await;
        let mut guard = entry.lock().await;
        mutate(&mut guard);
        guard.touch();
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Remove sessions whose last write is older than `ttl`.
    ///
    /// Returns the number of sessions removed.
    pub async fn sweep(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now()
            - ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::hours(24));

        // Collect expired keys under the read lock, then remove them
        // under the write lock so sweeps don't starve readers.
        let mut expired = Vec::new();
        {
            let map = self.inner.read().await;
            for (key, entry) in map.iter() {
                let context = entry.lock().await;
                if context.last_updated < cutoff {
                    expired.push(key.clone());
                }
            }
        }

        if expired.is_empty() {
            return 0;
        }

        let mut map = self.inner.write().await;
        let mut removed = 0;
        for key in expired {
            if map.remove(&key).is_some() {
                info!("swept expired session: {key}");
                removed += 1;
            }
        }
        removed
    }

    /// Spawn a background task sweeping expired sessions on an interval.
    #[must_use]
    pub fn spawn_sweeper(&self, interval: Duration, ttl: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.sweep(ttl).await;
            }
        })
    }

    async fn entry(&self, session_id: &str) -> Arc<Mutex<SessionContext>> {
        {
            let map = self.inner.read().await;
            if let Some(entry) = map.get(session_id) {
                return Arc::clone(entry);
            }
        }
        let mut map = self.inner.write().await;
        Arc::clone(
            map.entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(SessionContext::default()))),
        )
    }
}
