use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillhub_api::background;
use skillhub_api::config::ServerConfig;
use skillhub_api::notifications::email::Mailer;
use skillhub_api::router::build_app_router;
use skillhub_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skillhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Configuration loaded");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = skillhub_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    skillhub_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    skillhub_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");

    let mailer = Mailer::from_env();
    if mailer.is_configured() {
        tracing::info!("SMTP mailer configured");
    }

    let state = AppState::new(pool.clone(), config.clone(), mailer);

    // Expired-session purge runs for the life of the process and is torn
    // down via the cancellation token after the listener drains.
    let sweeper_cancel = tokio_util::sync::CancellationToken::new();
    let sweeper_handle = tokio::spawn(background::session_sweeper::run(
        pool,
        sweeper_cancel.clone(),
    ));

    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Listener drained, stopping background tasks");

    sweeper_cancel.cancel();
    let _ = tokio::time::timeout(
        Duration::from_secs(config.shutdown_timeout_secs),
        sweeper_handle,
    )
    .await;

    tracing::info!("Shutdown complete");
}

/// Resolve when the process is asked to stop.
///
/// Listens for both SIGINT (interactive Ctrl-C) and, on Unix, SIGTERM
/// (process managers: systemd, Docker, Kubernetes), whichever arrives
/// first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("SIGINT received, shutting down");
        }
        () = terminate => {
            tracing::info!("SIGTERM received, shutting down");
        }
    }
}
