use std::sync::Arc;

use shared::AppError;
use sqlx::SqlitePool;

use super::auth::{JwtConfig, JwtService};
use super::config::Config;
use crate::db::DbService;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database under `work_dir` and build the JWT service
    /// from the environment.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db = DbService::new(&config.db_path()).await?;
        let jwt_service = Arc::new(JwtService::new(JwtConfig::default()));

        Ok(Self {
            config: config.clone(),
            pool: db.pool().clone(),
            jwt_service,
        })
    }

    /// Assemble state from parts. Tests use this with a throwaway pool.
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn work_dir(&self) -> &str {
        &self.config.work_dir
    }
}
