//! Data models
//!
//! Shared between crewdesk-server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod job;
pub mod user;

// Re-exports
pub use job::*;
pub use user::*;
