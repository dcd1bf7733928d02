//! Input validation for the registration and password flows.
//!
//! Validators return `Err` with a human-readable message; the API layer
//! collects them into field-level detail on the 400 response.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Pragmatic RFC 5322 subset: local part, `@`, dotted domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid regex")
});

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted email length (RFC 5321 forward-path limit).
const MAX_EMAIL_LENGTH: usize = 254;

/// A single field-level validation failure, carried on 400 responses.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Normalize an email for storage and lookup: trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate that an email address is well-formed.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err("Email is too long".to_string());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Email is not a valid address".to_string());
    }
    Ok(())
}

/// Validate password complexity: minimum length plus at least one upper-case
/// letter, one lower-case letter, one digit, and one special character.
pub fn validate_password_complexity(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an upper-case letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lower-case letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit".to_string());
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err("Password must contain a special character".to_string());
    }
    Ok(())
}

/// Validate that a display name component is non-empty.
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name must not be empty".to_string());
    }
    Ok(())
}
