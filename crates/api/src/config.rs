use crate::auth::jwt::JwtConfig;

/// Default auth-endpoint rate limit: requests per window.
const DEFAULT_RATE_LIMIT_MAX: u32 = 5;

/// Default auth-endpoint rate limit window in seconds (15 minutes).
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 900;

/// Default session mirror TTL in seconds (1 hour).
const DEFAULT_SESSION_CACHE_TTL_SECS: u64 = 3600;

/// Per-IP fixed-window rate limit for the `/auth` prefix.
///
/// Deliberately stricter than a general API posture: these endpoints are
/// the ones worth brute-forcing.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window per client IP.
    pub max_requests: u32,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateLimitConfig {
    /// Load from `AUTH_RATE_LIMIT_MAX` / `AUTH_RATE_LIMIT_WINDOW_SECS`.
    pub fn from_env() -> Self {
        let max_requests: u32 = std::env::var("AUTH_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT_MAX.to_string())
            .parse()
            .expect("AUTH_RATE_LIMIT_MAX must be a valid u32");

        let window_secs: u64 = std::env::var("AUTH_RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| DEFAULT_RATE_LIMIT_WINDOW_SECS.to_string())
            .parse()
            .expect("AUTH_RATE_LIMIT_WINDOW_SECS must be a valid u64");

        Self {
            max_requests,
            window_secs,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development except
/// the JWT secrets. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Session mirror TTL in seconds (default: `3600`).
    pub session_cache_ttl_secs: u64,
    /// JWT token configuration (secrets, expiry durations).
    pub jwt: JwtConfig,
    /// Rate limit for the `/auth` prefix.
    pub auth_rate_limit: RateLimitConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `3000`                  |
    /// | `CORS_ORIGINS`                | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                    |
    /// | `SESSION_CACHE_TTL_SECS`      | `3600`                  |
    /// | `AUTH_RATE_LIMIT_MAX`         | `5`                     |
    /// | `AUTH_RATE_LIMIT_WINDOW_SECS` | `900`                   |
    ///
    /// JWT variables are documented on [`JwtConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let session_cache_ttl_secs: u64 = std::env::var("SESSION_CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SESSION_CACHE_TTL_SECS.to_string())
            .parse()
            .expect("SESSION_CACHE_TTL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            session_cache_ttl_secs,
            jwt: JwtConfig::from_env(),
            auth_rate_limit: RateLimitConfig::from_env(),
        }
    }
}
