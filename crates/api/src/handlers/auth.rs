//! Handlers for the `/auth` resource: registration, login, token refresh,
//! logout, password recovery, and email verification.
//!
//! Each handler is atomic from the caller's perspective and sequences the
//! credential store, lockout policy, token issuer, session store, and
//! mailer. Activity-log writes are fire-and-forget and never fail the
//! primary operation.

use std::str::FromStr;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use skillhub_core::account::{AccountStatus, UserRole};
use skillhub_core::error::CoreError;
use skillhub_core::lockout::LoginGate;
use skillhub_core::types::DbId;
use skillhub_core::validation::{
    normalize_email, validate_email, validate_name, validate_password_complexity, FieldError,
};
use skillhub_db::models::activity::CreateActivityLog;
use skillhub_db::models::session::CreateSession;
use skillhub_db::models::user::{CreateUser, User, UserResponse};
use skillhub_db::repositories::{ActivityLogRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_token, verify_refresh_token,
};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::generate_opaque_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Password-reset token lifetime in minutes.
const RESET_TOKEN_TTL_MINS: i64 = 60;

/// Uniform message for unknown-email and wrong-password failures, so the
/// response never reveals whether the account exists.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Uniform message for invalid or expired reset tokens; "expired" and
/// "never existed" are deliberately indistinguishable.
const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

/// Generic acknowledgement for forgot-password, byte-identical whether or
/// not the account exists.
const FORGOT_PASSWORD_ACK: &str =
    "If an account with that email exists, a password reset link has been sent";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Optional role; defaults to `student`.
    pub role: Option<String>,
}

/// Response body for `POST /auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: DbId,
    pub email: String,
    pub email_verification_required: bool,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Extends the refresh window from 7 to 30 days.
    #[serde(default)]
    pub remember_me: bool,
}

/// Successful authentication response returned by login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Optional so a missing field maps to 400 rather than a body-decode
    /// rejection.
    pub refresh_token: Option<String>,
}

/// Response body for `POST /auth/refresh`.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// The same refresh token, echoed back unrotated.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Request body for `POST /auth/verify-email`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/register
///
/// Create a new credential record in status `inactive` and dispatch a
/// verification email. Email dispatch failure is logged but does not fail
/// registration; the account exists regardless and verification can be
/// retried out of band.
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let role = validate_register(&input)?;
    let email = normalize_email(&input.email);

    // Pre-check for a friendly conflict message; the unique index on
    // users.email backstops the race between check and insert.
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let verification_token = generate_opaque_token();

    let create_dto = CreateUser {
        email: email.clone(),
        password_hash,
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        role: role.as_str().to_string(),
        email_verification_token: verification_token.clone(),
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;

    // Non-fatal: the account exists whether or not the email goes out.
    if let Err(e) = state
        .mailer
        .send_verification_email(&user.email, &verification_token, &user.display_name())
        .await
    {
        tracing::warn!(user_id = user.id, error = %e, "Verification email dispatch failed");
    }

    let (ip, user_agent) = client_meta(&headers);
    log_activity(
        &state,
        CreateActivityLog {
            user_id: Some(user.id),
            action: "register".into(),
            description: format!("Account registered for {}", user.email),
            ip_address: ip,
            user_agent,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            email: user.email,
            email_verification_required: true,
        }),
    ))
}

/// POST /auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens
/// plus the public user projection.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);

    // 1. Find the user. Unknown email gets the same message as a wrong
    //    password.
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into())))?;

    // 2. Lockout gate. Checked before password verification so a locked
    //    account reveals nothing about password correctness. The unlock
    //    time stays out of the response body.
    if let LoginGate::Locked { .. } = state.lockout.evaluate(user.locked_until, Utc::now()) {
        return Err(AppError::Core(CoreError::AccountLocked(
            "Account is temporarily locked due to repeated failed logins. Try again later.".into(),
        )));
    }

    // 3. Verify the password.
    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        // 4. On failure: single-statement increment with read-back, lock
        //    when the new count reaches the threshold.
        let attempts = UserRepo::increment_failed_login(&state.pool, user.id).await?;
        if let Some(until) = state.lockout.lock_after_failure(attempts, Utc::now()) {
            UserRepo::lock_account(&state.pool, user.id, until).await?;
            tracing::info!(user_id = user.id, "Account locked after repeated failures");
        }
        return Err(AppError::Core(CoreError::Unauthorized(
            INVALID_CREDENTIALS.into(),
        )));
    }

    // 5. Account status gate.
    let status = AccountStatus::from_str(&user.status)
        .map_err(|e| AppError::InternalError(format!("Corrupt account status: {e}")))?;
    match status {
        AccountStatus::Suspended => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Account is suspended".into(),
            )));
        }
        AccountStatus::Inactive => {
            return Err(AppError::Core(CoreError::Forbidden(
                "Email verification required before login".into(),
            )));
        }
        AccountStatus::Active => {}
    }

    // 6. Issue tokens and persist the session.
    let (ip, user_agent) = client_meta(&headers);
    let response =
        create_session_response(&state, &user, input.remember_me, ip.clone(), user_agent.clone())
            .await?;

    // 7. Clear counters, stamp last_login_at, bump login_count.
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    log_activity(
        &state,
        CreateActivityLog {
            user_id: Some(user.id),
            action: "login".into(),
            description: format!("Successful login for {}", user.email),
            ip_address: ip,
            user_agent,
        },
    );

    Ok(Json(response))
}

/// POST /auth/refresh
///
/// Exchange a valid refresh token for a fresh access token. The refresh
/// token itself is echoed back unrotated; it stays valid until logout or
/// its natural expiry.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let refresh_token = match input.refresh_token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AppError::BadRequest("refresh_token is required".into())),
    };

    // 1. Signature + expiry. Both failures surface as the same 401.
    let claims = verify_refresh_token(refresh_token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        ))
    })?;

    // 2. The persisted session is authoritative: it must still be active
    //    and inside its refresh window, and the presented token must be
    //    the one the session was created with. Covers logout-then-replay
    //    and natural expiry.
    let session = SessionRepo::find_active(&state.pool, &claims.sid, claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    if hash_token(refresh_token) != session.refresh_token_hash {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid or expired refresh token".into(),
        )));
    }

    // 3. The account must still be in good standing.
    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if user.status == AccountStatus::Suspended.as_str() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is suspended".into(),
        )));
    }

    // 4. Mint a fresh access token and touch the session.
    let access_token = generate_access_token(
        user.id,
        &user.email,
        &user.role,
        &session.session_token,
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    SessionRepo::touch(&state.pool, session.id).await?;
    state
        .session_cache
        .insert(user.id, &session.session_token)
        .await;

    Ok(Json(RefreshResponse {
        access_token,
        refresh_token: refresh_token.to_string(),
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    }))
}

/// POST /auth/logout
///
/// Revoke the presented token's session and deny-list the token for its
/// remaining lifetime. Idempotent: logging out an already-inactive
/// session still succeeds.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    auth_user: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    let revoked =
        SessionRepo::revoke(&state.pool, &auth_user.session_token, auth_user.user_id).await?;
    if !revoked {
        tracing::debug!(
            user_id = auth_user.user_id,
            "Logout for already-inactive session"
        );
    }

    state.session_cache.remove(auth_user.user_id).await;
    state
        .deny_list
        .insert(&auth_user.raw_token, auth_user.token_expires_at)
        .await;

    let (ip, user_agent) = client_meta(&headers);
    log_activity(
        &state,
        CreateActivityLog {
            user_id: Some(auth_user.user_id),
            action: "logout".into(),
            description: format!("Logout for {}", auth_user.email),
            ip_address: ip,
            user_agent,
        },
    );

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// POST /auth/forgot-password
///
/// Issue a password-reset token and email it. The acknowledgement is
/// byte-identical whether or not the account exists; a failed email
/// dispatch, however, surfaces as a 500, because the entire point of the
/// call is the email.
pub async fn forgot_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    if let Err(message) = validate_email(&input.email) {
        return Err(AppError::Validation(vec![FieldError::new("email", message)]));
    }
    let email = normalize_email(&input.email);

    if let Some(user) = UserRepo::find_by_email(&state.pool, &email).await? {
        let token = generate_opaque_token();
        let expires_at = Utc::now() + chrono::Duration::minutes(RESET_TOKEN_TTL_MINS);
        UserRepo::set_reset_token(&state.pool, user.id, &token, expires_at).await?;

        // Fatal on failure: a reset request with no delivered email is
        // useless and the caller needs to know to retry.
        state
            .mailer
            .send_password_reset_email(&user.email, &token, &user.display_name())
            .await
            .map_err(|e| {
                AppError::InternalError(format!("Password reset email dispatch failed: {e}"))
            })?;

        let (ip, user_agent) = client_meta(&headers);
        log_activity(
            &state,
            CreateActivityLog {
                user_id: Some(user.id),
                action: "password_reset_request".into(),
                description: format!("Password reset requested for {}", user.email),
                ip_address: ip,
                user_agent,
            },
        );
    }

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_ACK)))
}

/// POST /auth/reset-password
///
/// Complete a password reset with a previously emailed token. On success
/// every session the user holds is revoked.
pub async fn reset_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    if let Err(message) = validate_password_complexity(&input.password) {
        return Err(AppError::Validation(vec![FieldError::new(
            "password", message,
        )]));
    }
    if input.token.is_empty() {
        return Err(AppError::BadRequest(INVALID_RESET_TOKEN.into()));
    }

    let user = UserRepo::find_by_reset_token(&state.pool, &input.token)
        .await?
        .ok_or_else(|| AppError::BadRequest(INVALID_RESET_TOKEN.into()))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // Stores the new hash, clears both reset fields, clears lockout
    // counters.
    UserRepo::reset_password(&state.pool, user.id, &password_hash).await?;

    // Credential-recovery response: kill every session the user holds.
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    state.session_cache.remove(user.id).await;
    tracing::info!(user_id = user.id, revoked, "Password reset; sessions revoked");

    let (ip, user_agent) = client_meta(&headers);
    log_activity(
        &state,
        CreateActivityLog {
            user_id: Some(user.id),
            action: "password_reset".into(),
            description: format!("Password reset completed for {}", user.email),
            ip_address: ip,
            user_agent,
        },
    );

    Ok(Json(MessageResponse::new(
        "Password has been reset successfully",
    )))
}

/// POST /auth/verify-email
///
/// Confirm an email address with the token issued at registration and
/// flip the account to `active`. The token is single-use: it is cleared
/// on success, so a second call finds nothing and fails.
pub async fn verify_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    if input.token.is_empty() {
        return Err(AppError::BadRequest("Invalid verification token".into()));
    }

    let user = UserRepo::find_by_verification_token(&state.pool, &input.token)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid verification token".into()))?;

    if user.email_verified {
        return Err(AppError::BadRequest("Email is already verified".into()));
    }

    UserRepo::mark_email_verified(&state.pool, user.id).await?;

    let (ip, user_agent) = client_meta(&headers);
    log_activity(
        &state,
        CreateActivityLog {
            user_id: Some(user.id),
            action: "email_verified".into(),
            description: format!("Email verified for {}", user.email),
            ip_address: ip,
            user_agent,
        },
    );

    Ok(Json(MessageResponse::new("Email verified successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate the registration payload, returning the parsed role.
fn validate_register(input: &RegisterRequest) -> Result<UserRole, AppError> {
    let mut fields = Vec::new();

    if let Err(message) = validate_email(&input.email) {
        fields.push(FieldError::new("email", message));
    }
    if let Err(message) = validate_password_complexity(&input.password) {
        fields.push(FieldError::new("password", message));
    }
    if let Err(message) = validate_name(&input.first_name) {
        fields.push(FieldError::new("first_name", message));
    }
    if let Err(message) = validate_name(&input.last_name) {
        fields.push(FieldError::new("last_name", message));
    }

    let role = match input.role.as_deref() {
        None => UserRole::Student,
        Some(raw) => match UserRole::from_str(raw) {
            Ok(role) => role,
            Err(message) => {
                fields.push(FieldError::new("role", message));
                UserRole::Student
            }
        },
    };

    if fields.is_empty() {
        Ok(role)
    } else {
        Err(AppError::Validation(fields))
    }
}

/// Issue access + refresh tokens, persist the session row, mirror it in
/// the session cache, and build the login response.
async fn create_session_response(
    state: &AppState,
    user: &User,
    remember_me: bool,
    ip_address: Option<String>,
    user_agent: Option<String>,
) -> AppResult<AuthResponse> {
    let session_token = Uuid::new_v4().to_string();

    let access_token = generate_access_token(
        user.id,
        &user.email,
        &user.role,
        &session_token,
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh_token =
        generate_refresh_token(user.id, &session_token, remember_me, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let window = chrono::Duration::days(state.config.jwt.refresh_window_days(remember_me));
    let expires_at = Utc::now() + window;

    let session_input = CreateSession {
        session_token: session_token.clone(),
        user_id: user.id,
        refresh_token_hash: hash_token(&refresh_token),
        expires_at,
        refresh_expires_at: expires_at,
        user_agent,
        ip_address,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    state.session_cache.insert(user.id, &session_token).await;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from(user),
    })
}

/// Extract best-effort client metadata (IP, user agent) for audit fields.
fn client_meta(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    (ip, user_agent)
}

/// Fire-and-forget activity log write. Failures are logged and swallowed;
/// the audit sink is best-effort, never a transactional participant.
fn log_activity(state: &AppState, entry: CreateActivityLog) {
    let pool = state.pool.clone();
    tokio::spawn(async move {
        if let Err(e) = ActivityLogRepo::insert(&pool, &entry).await {
            tracing::warn!(error = %e, action = %entry.action, "Activity log write failed");
        }
    });
}
