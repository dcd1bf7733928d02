//! Application router assembly.
//!
//! [`build_app_router`] is the single place the middleware stack is put
//! together; the binary and the HTTP integration tests both go through it
//! so they exercise identical layers.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::auth_rate_limit;
use crate::routes;
use crate::state::AppState;

/// Assemble the application [`Router`]: health at the root, the auth
/// endpoints nested under `/auth` behind their per-IP rate limiter, and
/// the shared middleware stack around everything.
///
/// Layer order matters; axum applies `.layer` calls bottom-up, so the
/// listing below runs top-down per request: CORS, request-id assignment,
/// tracing, request-id propagation, timeout, panic recovery.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");

    // The limiter applies to the auth subtree only; the health probe is
    // exempt so orchestration checks never get throttled.
    let auth_routes = routes::auth::router().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        auth_rate_limit,
    ));

    Router::new()
        .merge(routes::health::router())
        .nest("/auth", auth_routes)
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// CORS layer from the configured origin list.
///
/// An unparseable origin panics at startup; a misconfigured deployment
/// should refuse to boot rather than serve with a silently empty allow
/// list.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
