use std::sync::Arc;
use std::time::Duration;

use skillhub_core::lockout::LockoutPolicy;

use crate::auth::deny_list::TokenDenyList;
use crate::auth::session_cache::SessionCache;
use crate::config::ServerConfig;
use crate::middleware::rate_limit::RateLimiter;
use crate::notifications::email::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: skillhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Failed-login lockout policy.
    pub lockout: Arc<LockoutPolicy>,
    /// Invalidation mirror of the latest session per user.
    pub session_cache: Arc<SessionCache>,
    /// Access tokens invalidated at logout.
    pub deny_list: Arc<TokenDenyList>,
    /// Per-IP limiter for the `/auth` prefix.
    pub rate_limiter: Arc<RateLimiter>,
    /// Outbound email dispatcher (verification / reset mail).
    pub mailer: Arc<Mailer>,
}

impl AppState {
    /// Assemble the state from a pool, configuration, and mailer.
    pub fn new(pool: skillhub_db::DbPool, config: ServerConfig, mailer: Mailer) -> Self {
        let session_cache = SessionCache::new(Duration::from_secs(config.session_cache_ttl_secs));
        let rate_limiter = RateLimiter::new(
            config.auth_rate_limit.max_requests,
            Duration::from_secs(config.auth_rate_limit.window_secs),
        );
        Self {
            pool,
            config: Arc::new(config),
            lockout: Arc::new(LockoutPolicy::default()),
            session_cache: Arc::new(session_cache),
            deny_list: Arc::new(TokenDenyList::new()),
            rate_limiter: Arc::new(rate_limiter),
            mailer: Arc::new(mailer),
        }
    }
}
