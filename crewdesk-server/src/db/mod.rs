//! SQLite bootstrap and the repository layer.

pub mod repository;

use std::str::FromStr;

use shared::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

/// Embedded migrations; tests run these against throwaway database files.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Owns the connection pool and applies migrations on startup.
pub struct DbService {
    pool: SqlitePool,
}

impl DbService {
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // Writers wait instead of failing fast under WAL contention
        sqlx::query("PRAGMA busy_timeout = 5000")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        tracing::info!(db_path, "Database ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bootstrap.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();

        let users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
            .fetch_one(db.pool())
            .await
            .unwrap();
        let jobs: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(users.0, 0);
        assert_eq!(jobs.0, 0);
    }

    #[tokio::test]
    async fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reopen.db");
        drop(DbService::new(path.to_str().unwrap()).await.unwrap());
        // Second open re-runs the migrator against applied migrations
        assert!(DbService::new(path.to_str().unwrap()).await.is_ok());
    }
}
