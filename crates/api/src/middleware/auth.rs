//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use skillhub_core::error::CoreError;
use skillhub_core::types::{DbId, Timestamp};

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// The extractor validates the signature and expiry, then consults the
/// deny-list so an access token presented after logout is rejected even
/// though its signature is still valid. The raw token and its expiry are
/// kept on the struct because logout needs them to deny-list the token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's normalized email (from `claims.email`).
    pub email: String,
    /// The user's role name (`"student"` or `"teacher"`).
    pub role: String,
    /// The opaque session token the JWT is bound to (from `claims.sid`).
    pub session_token: String,
    /// The raw bearer token as presented.
    pub raw_token: String,
    /// The token's natural expiry.
    pub token_expires_at: Timestamp,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = verify_access_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // Logout deny-lists the exact token; uniform message with the
        // signature failure so token state cannot be probed.
        if state.deny_list.contains(token).await {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".into(),
            )));
        }

        let token_expires_at = chrono::DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
            session_token: claims.sid,
            raw_token: token.to_string(),
            token_expires_at,
        })
    }
}
