//! Route definitions.
//!
//! ```text
//! /health                 service + database health (root level)
//!
//! /auth/register          create an account (public)
//! /auth/login             authenticate (public)
//! /auth/refresh           mint a new access token (public)
//! /auth/logout            revoke the current session (requires auth)
//! /auth/forgot-password   request a reset email (public)
//! /auth/reset-password    complete a reset (public)
//! /auth/verify-email      confirm an email address (public)
//! ```

pub mod auth;
pub mod health;
