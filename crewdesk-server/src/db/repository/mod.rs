//! Data access. Free functions over the pool; domain errors are
//! produced at the query site.

pub mod job;
pub mod user;

use shared::AppError;

pub(crate) fn db_error(e: sqlx::Error) -> AppError {
    AppError::database(e.to_string())
}
