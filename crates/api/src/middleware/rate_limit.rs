//! Per-IP fixed-window rate limiting for the `/auth` prefix.
//!
//! Auth endpoints get a much stricter budget than the rest of the API:
//! they are the ones worth brute-forcing. The window is fixed (not
//! sliding) which is sufficient at this threshold and keeps the state a
//! single counter per client.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::state::AppState;

struct WindowEntry {
    count: u32,
    window_start: Instant,
}

/// Fixed-window counter per client key.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    hits: RwLock<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            hits: RwLock::new(HashMap::new()),
        }
    }

    /// Record a hit for `key` and report whether it is within budget.
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut hits = self.hits.write().await;

        // Drop windows that have fully elapsed so the map stays bounded
        // by recently-seen clients.
        let window = self.window;
        hits.retain(|_, entry| now.duration_since(entry.window_start) < window);

        let entry = hits.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            window_start: now,
        });

        entry.count += 1;
        entry.count <= self.max_requests
    }
}

/// Best-effort client key: `x-forwarded-for` first hop, else the literal
/// `"unknown"` bucket. Behind a proxy the header is the real client; the
/// shared fallback bucket still bounds anonymous abuse.
fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Axum middleware enforcing the auth rate limit. Mounted on the `/auth`
/// router only.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    if !state.rate_limiter.check(&key).await {
        tracing::warn!(client = %key, "Auth rate limit exceeded");
        return AppError::RateLimited.into_response();
    }
    next.run(request).await
}
