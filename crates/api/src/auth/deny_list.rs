//! In-process deny-list for access tokens invalidated before their natural
//! expiry (logout).
//!
//! Entries are keyed by the raw token and carry the token's own expiry, so
//! the list never outgrows the set of still-signature-valid tokens.
//! Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
//! shared through [`crate::state::AppState`].

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use skillhub_core::types::Timestamp;

/// Deny-listed access tokens with their natural expiry instants.
#[derive(Default)]
pub struct TokenDenyList {
    entries: RwLock<HashMap<String, Timestamp>>,
}

impl TokenDenyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deny-list a token until its natural expiry. Tokens already past
    /// expiry are not stored; signature validation rejects them anyway.
    pub async fn insert(&self, token: &str, expires_at: Timestamp) {
        if expires_at <= Utc::now() {
            return;
        }
        let mut entries = self.entries.write().await;
        // Opportunistic purge keeps the map bounded by live tokens.
        let now = Utc::now();
        entries.retain(|_, exp| *exp > now);
        entries.insert(token.to_string(), expires_at);
    }

    /// Whether the token has been deny-listed and is still inside its
    /// natural lifetime.
    pub async fn contains(&self, token: &str) -> bool {
        let entries = self.entries.read().await;
        match entries.get(token) {
            Some(expires_at) => *expires_at > Utc::now(),
            None => false,
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
