//! Periodic cleanup of expired and revoked sessions.
//!
//! Spawns a background loop that deletes rows from `user_sessions` that
//! are past their refresh window or already revoked. Runs on a fixed
//! interval using `tokio::time::interval` until cancelled.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use skillhub_db::repositories::SessionRepo;

/// How often the cleanup job runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the session sweeper loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Session sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Session sweeper: purged dead sessions");
                        } else {
                            tracing::debug!("Session sweeper: nothing to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Session sweeper: cleanup failed");
                    }
                }
            }
        }
    }
}
