//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Safe response projections where the entity carries secrets

pub mod activity;
pub mod session;
pub mod user;
