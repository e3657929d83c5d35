//! Shared types for Crewdesk
//!
//! Common types used across crates: data models, the unified error
//! system, and small utilities (timestamps, ID generation).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Job, JobStatus, Role, User, UserInfo};
