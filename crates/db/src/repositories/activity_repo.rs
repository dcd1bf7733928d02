//! Repository for the `activity_log` table (append-only).

use sqlx::PgPool;

use crate::models::activity::{ActivityLog, CreateActivityLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, action, description, ip_address, user_agent, created_at";

/// Provides the insert operation for activity log entries. The log is an
/// append-only audit sink; nothing in this service updates, deletes, or
/// reads it back.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Insert a new activity log entry, returning the created row.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log (user_id, action, description, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(input.user_id)
            .bind(&input.action)
            .bind(&input.description)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }
}
