//! Repository for the `user_sessions` table.

use sqlx::PgPool;
use skillhub_core::types::DbId;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_token, user_id, refresh_token_hash, expires_at, \
                        refresh_expires_at, is_active, revoked_at, user_agent, ip_address, \
                        last_accessed_at, created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (session_token, user_id, refresh_token_hash, \
                                        expires_at, refresh_expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(&input.session_token)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(input.refresh_expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Find a session usable for refresh: owned by the user, still active,
    /// and inside its refresh window. The persisted row is the sole source
    /// of truth for refresh validity.
    pub async fn find_active(
        pool: &PgPool,
        session_token: &str,
        user_id: DbId,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE session_token = $1
               AND user_id = $2
               AND is_active = TRUE
               AND refresh_expires_at > NOW()"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(session_token)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Update `last_accessed_at` after a successful refresh.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE user_sessions SET last_accessed_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Revoke a single session. Returns `true` if a row transitioned from
    /// active to revoked; revoking an already-inactive session is a no-op.
    pub async fn revoke(
        pool: &PgPool,
        session_token: &str,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET
                is_active = FALSE,
                revoked_at = NOW(),
                updated_at = NOW()
             WHERE session_token = $1 AND user_id = $2 AND is_active = TRUE",
        )
        .bind(session_token)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke all active sessions for a user. Returns the count revoked.
    ///
    /// Used by password reset as the "kill all sessions" response to a
    /// credential-recovery event.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET
                is_active = FALSE,
                revoked_at = NOW(),
                updated_at = NOW()
             WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired or revoked sessions. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_sessions WHERE refresh_expires_at < NOW() OR is_active = FALSE",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
