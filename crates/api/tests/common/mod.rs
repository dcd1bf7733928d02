//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the application router through the same [`build_app_router`]
//! the production binary uses, so tests exercise the full middleware
//! stack (CORS, request ID, timeout, tracing, panic recovery, auth rate
//! limiting).

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use skillhub_api::auth::jwt::JwtConfig;
use skillhub_api::config::{RateLimitConfig, ServerConfig};
use skillhub_api::notifications::email::Mailer;
use skillhub_api::router::build_app_router;
use skillhub_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// The rate limit is set high enough that ordinary tests never trip it;
/// the rate-limit test constructs its own config.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        session_cache_ttl_secs: 3600,
        jwt: test_jwt_config(),
        auth_rate_limit: RateLimitConfig {
            max_requests: 10_000,
            window_secs: 900,
        },
    }
}

/// JWT config with fixed test secrets.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-long-enough-for-hmac".to_string(),
        refresh_secret: "test-refresh-secret-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 60,
        refresh_token_expiry_days: 7,
        remember_me_expiry_days: 30,
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and a disabled mailer.
///
/// The returned `Router` is cheaply cloneable and clones share state, so
/// a single test can issue several requests against the same deny-list
/// and cache.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Like [`build_test_app`] but with an explicit config (used by the
/// rate-limit test).
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone(), Mailer::new(None));
    build_app_router(state, &config)
}

/// Issue a GET request.
#[allow(dead_code)]
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Issue a POST with a JSON body.
#[allow(dead_code)]
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Issue a POST with a JSON body and a Bearer token.
#[allow(dead_code)]
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should succeed")
}

/// Collect a response body into raw bytes.
#[allow(dead_code)]
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
