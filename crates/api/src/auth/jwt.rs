//! JWT issuance and verification for access and refresh tokens.
//!
//! Both kinds are HS256-signed but use distinct secrets and lifetimes, so
//! an access token can never pass refresh verification or vice versa.
//! Access tokens are stateless; refresh tokens point back at a persisted
//! session via the `sid` claim, and only their SHA-256 hash is stored
//! server-side.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use skillhub_core::types::DbId;

/// Claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// The user's normalized email address.
    pub email: String,
    /// The user's role name (`"student"` or `"teacher"`).
    pub role: String,
    /// Opaque session token tying this JWT to a persisted session.
    pub sid: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Claims embedded in every refresh token. Deliberately minimal: the
/// session row carries everything else.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Opaque session token tying this JWT to a persisted session.
    pub sid: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for JWT generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens.
    pub refresh_secret: String,
    /// Access token lifetime in minutes (default: 60).
    pub access_token_expiry_mins: i64,
    /// Refresh token lifetime in days (default: 7).
    pub refresh_token_expiry_days: i64,
    /// Refresh token lifetime in days when "remember me" is set (default: 30).
    pub remember_me_expiry_days: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;
/// Default refresh token expiry in days.
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;
/// Default remember-me refresh expiry in days.
const DEFAULT_REMEMBER_ME_EXPIRY_DAYS: i64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                       | Required | Default |
    /// |-------------------------------|----------|---------|
    /// | `JWT_ACCESS_SECRET`           | **yes**  | --      |
    /// | `JWT_REFRESH_SECRET`          | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`      | no       | `60`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`     | no       | `7`     |
    /// | `JWT_REMEMBER_ME_EXPIRY_DAYS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if either secret is unset or empty, or the secrets are equal.
    pub fn from_env() -> Self {
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .expect("JWT_ACCESS_SECRET must be set in the environment");
        assert!(
            !access_secret.is_empty(),
            "JWT_ACCESS_SECRET must not be empty"
        );

        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .expect("JWT_REFRESH_SECRET must be set in the environment");
        assert!(
            !refresh_secret.is_empty(),
            "JWT_REFRESH_SECRET must not be empty"
        );
        assert!(
            access_secret != refresh_secret,
            "JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ"
        );

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        let refresh_token_expiry_days: i64 = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REFRESH_EXPIRY_DAYS must be a valid i64");

        let remember_me_expiry_days: i64 = std::env::var("JWT_REMEMBER_ME_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_REMEMBER_ME_EXPIRY_DAYS.to_string())
            .parse()
            .expect("JWT_REMEMBER_ME_EXPIRY_DAYS must be a valid i64");

        Self {
            access_secret,
            refresh_secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
            remember_me_expiry_days,
        }
    }

    /// Refresh window in days for the given remember-me choice.
    pub fn refresh_window_days(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.remember_me_expiry_days
        } else {
            self.refresh_token_expiry_days
        }
    }
}

/// Generate an HS256 access token for the given user and session.
pub fn generate_access_token(
    user_id: DbId,
    email: &str,
    role: &str,
    session_token: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = AccessClaims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        sid: session_token.to_string(),
        iat: now,
        exp,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.access_secret.as_bytes()),
    )
}

/// Generate an HS256 refresh token bound to the given session.
///
/// The lifetime is 7 days, or 30 when `remember_me` is set.
pub fn generate_refresh_token(
    user_id: DbId,
    session_token: &str,
    remember_me: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.refresh_window_days(remember_me) * 24 * 3600;

    let claims = RefreshClaims {
        sub: user_id,
        sid: session_token.to_string(),
        iat: now,
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.refresh_secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded claims.
///
/// Signature-invalid and expired both come back as errors the caller maps
/// to a single uniform 401.
pub fn verify_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(config.access_secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Validate and decode a refresh token, returning the embedded claims.
pub fn verify_refresh_token(
    token: &str,
    config: &JwtConfig,
) -> Result<RefreshClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(config.refresh_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Compute the SHA-256 hex digest of a token.
///
/// Used to compare an incoming refresh token against the stored hash;
/// the plaintext refresh token is never persisted.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to build a test config with known secrets.
    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret-long-enough-for-hmac".to_string(),
            refresh_secret: "refresh-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 7,
            remember_me_expiry_days: 30,
        }
    }

    #[test]
    fn access_token_round_trips_claims() {
        let config = test_config();
        let token = generate_access_token(42, "alice@example.com", "student", "sess-1", &config)
            .expect("token generation should succeed");

        let claims = verify_access_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.role, "student");
        assert_eq!(claims.sid, "sess-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_round_trips_claims() {
        let config = test_config();
        let token = generate_refresh_token(7, "sess-2", false, &config)
            .expect("token generation should succeed");

        let claims = verify_refresh_token(&token, &config).expect("validation should succeed");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.sid, "sess-2");
    }

    #[test]
    fn remember_me_extends_the_refresh_window() {
        let config = test_config();
        let short = generate_refresh_token(1, "s", false, &config).unwrap();
        let long = generate_refresh_token(1, "s", true, &config).unwrap();

        let short_claims = verify_refresh_token(&short, &config).unwrap();
        let long_claims = verify_refresh_token(&long, &config).unwrap();
        // 30 days vs 7 days, measured from the same clock within a second.
        assert!(long_claims.exp - short_claims.exp > 22 * 24 * 3600);
    }

    #[test]
    fn expired_access_token_fails() {
        let config = test_config();

        // Manually create an already-expired token, well past the default
        // 60-second validation leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            email: "x@example.com".to_string(),
            role: "student".to_string(),
            sid: "sess".to_string(),
            iat: now - 600,
            exp: now - 300,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.access_secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(
            verify_access_token(&token, &config).is_err(),
            "expired token must fail validation"
        );
    }

    #[test]
    fn token_kinds_do_not_cross_verify() {
        let config = test_config();

        let access =
            generate_access_token(1, "x@example.com", "student", "sess", &config).unwrap();
        let refresh = generate_refresh_token(1, "sess", false, &config).unwrap();

        // An access token must not pass refresh verification (distinct
        // secrets), and vice versa.
        assert!(verify_refresh_token(&access, &config).is_err());
        assert!(verify_access_token(&refresh, &config).is_err());
    }

    #[test]
    fn hash_token_is_stable_hex() {
        let token = "some.jwt.token";
        let a = hash_token(token);
        let b = hash_token(token);
        assert_eq!(a, b, "hash of the same token must be stable");
        assert_eq!(a.len(), 64);
        assert_ne!(a, hash_token("some.other.token"));
    }
}
