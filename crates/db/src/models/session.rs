//! User session model and DTOs.

use sqlx::FromRow;
use skillhub_core::types::{DbId, Timestamp};

/// A user session row from the `user_sessions` table.
///
/// `session_token` is an opaque identifier distinct from the JWTs; it is
/// what the refresh-token claims point back at. Only the SHA-256 hash of
/// the refresh token is stored, so a database leak does not hand out
/// usable tokens.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub session_token: String,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
    pub is_active: bool,
    pub revoked_at: Option<Timestamp>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub last_accessed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user session at login.
pub struct CreateSession {
    pub session_token: String,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub refresh_expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}
