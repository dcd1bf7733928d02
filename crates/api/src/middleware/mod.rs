//! Authentication and rate-limiting middleware.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT
//!   Bearer token, rejecting deny-listed tokens.
//! - [`rate_limit`] -- Per-IP fixed-window limiter for the `/auth` prefix.

pub mod auth;
pub mod rate_limit;
