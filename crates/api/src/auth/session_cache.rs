//! Invalidation mirror of the most recent session per user.
//!
//! Keys are `session:{user_id}`, values the opaque session token, TTL one
//! hour by default. Entries are written at login and refresh and dropped
//! at logout and password reset. The persisted session row is
//! authoritative for every authorization decision, so request handling
//! never reads this map; it deliberately exposes no lookup API. Expired
//! entries are purged opportunistically on insert, keeping the map
//! bounded by recently active users.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use skillhub_core::types::DbId;

struct CacheEntry {
    session_token: String,
    inserted_at: Instant,
}

/// TTL map mirroring the latest session token per user.
pub struct SessionCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SessionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(user_id: DbId) -> String {
        format!("session:{user_id}")
    }

    /// Record (or refresh) the mirrored session token for a user.
    pub async fn insert(&self, user_id: DbId, session_token: &str) {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        let ttl = self.ttl;
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
        entries.insert(
            Self::key(user_id),
            CacheEntry {
                session_token: session_token.to_string(),
                inserted_at: now,
            },
        );
    }

    /// Drop the mirror entry for a user (logout, password reset).
    pub async fn remove(&self, user_id: DbId) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.remove(&Self::key(user_id)) {
            tracing::debug!(
                user_id,
                session = %entry.session_token,
                "Session mirror entry dropped"
            );
        }
    }

    /// Number of live entries (expired ones may still be counted until the
    /// next insert purges them).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_records_one_entry_per_user() {
        let cache = SessionCache::new(Duration::from_secs(60));
        cache.insert(1, "sess-1").await;
        cache.insert(2, "sess-2").await;

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn newer_insert_replaces_the_entry() {
        let cache = SessionCache::new(Duration::from_secs(60));
        cache.insert(1, "sess-old").await;
        cache.insert(1, "sess-new").await;

        assert_eq!(cache.len().await, 1, "same user must not grow the map");
    }

    #[tokio::test]
    async fn remove_drops_the_entry() {
        let cache = SessionCache::new(Duration::from_secs(60));
        cache.insert(1, "sess-1").await;
        cache.remove(1).await;

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn removing_an_absent_entry_is_a_no_op() {
        let cache = SessionCache::new(Duration::from_secs(60));
        cache.remove(42).await;

        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn insert_purges_expired_entries() {
        let cache = SessionCache::new(Duration::from_millis(10));
        cache.insert(1, "sess-1").await;

        tokio::time::sleep(Duration::from_millis(30)).await;

        cache.insert(2, "sess-2").await;
        assert_eq!(cache.len().await, 1, "the lapsed entry must be gone");
    }
}
