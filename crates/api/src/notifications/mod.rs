//! Outbound notification dispatch.
//!
//! - [`email::Mailer`] -- verification and password-reset email over SMTP.

pub mod email;
