//! Shared response types for API handlers.

use serde::Serialize;

/// Standard `{ "message": ... }` response body for operations whose only
/// output is an acknowledgement (logout, password reset, verification).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
