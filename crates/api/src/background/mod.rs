//! Background maintenance tasks.
//!
//! - [`session_sweeper`] -- hourly purge of expired/revoked sessions.

pub mod session_sweeper;
