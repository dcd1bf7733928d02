//! User (credential record) entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use skillhub_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash and the verification/reset tokens -- NEVER
/// serialize this to API responses directly. Use [`UserResponse`] for
/// external-facing output.
///
/// `role` and `status` are stored as lower-case text; they are parsed into
/// the closed enums from `skillhub_core::account` at the API boundary.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub email_verified: bool,
    pub email_verified_at: Option<Timestamp>,
    pub email_verification_token: Option<String>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires_at: Option<Timestamp>,
    pub failed_login_attempts: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub login_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Display name used in outbound email.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Safe user representation for API responses (no password hash, no tokens).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub email_verified: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
            status: user.status.clone(),
            email_verified: user.email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user at registration.
///
/// New rows always start with status `inactive` and `email_verified =
/// false`; the verification token is issued up front.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub email_verification_token: String,
}
