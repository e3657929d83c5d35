//! Crewdesk Server - team and job assignment backend
//!
//! # Architecture overview
//!
//! - **Database** (`db`): embedded SQLite storage and repositories
//! - **Auth** (`server::auth`): JWT + Argon2, role capability table
//! - **Workflow** (`workflow`): job status transition rules
//! - **HTTP API** (`routes`, `handler`): RESTful API surface
//! - **Reporting** (`report`): dashboard statistics
//! - **Import** (`import`): CSV roster ingestion
//!
//! # Module structure
//!
//! ```text
//! crewdesk-server/src/
//! ├── server/        # Config, state, auth, HTTP lifecycle
//! ├── routes/        # Route tables and middleware stack
//! ├── handler/       # Request handlers
//! ├── db/            # Database service and repositories
//! ├── workflow/      # Job status transitions
//! ├── report/        # Dashboard statistics
//! ├── import/        # CSV roster import
//! └── utils/         # Logging setup
//! ```

pub mod db;
pub mod handler;
pub mod import;
pub mod report;
pub mod routes;
pub mod server;
pub mod utils;
pub mod workflow;

// Re-export public types
pub use server::auth::{CurrentUser, JwtService};
pub use server::{Config, Server, ServerState};

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($event:expr, $($rest:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($rest)*)
    };
    ($event:expr) => {
        tracing::warn!(target: "security", event = $event)
    };
}

/// Prepare the process environment: dotenv, work directory, logging.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    if config.log_dir.is_empty() {
        utils::logger::init_logger_with_file(log_level.as_deref(), None);
    } else {
        std::fs::create_dir_all(&config.log_dir)?;
        utils::logger::init_logger_with_file(log_level.as_deref(), Some(&config.log_dir));
    }

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______                        __           __
  / ____/_______ _      ______/ / ___  _____/ /__
 / /   / ___/ _ \ | /| / / __  / / _ \/ ___/ //_/
/ /___/ /  /  __/ |/ |/ / /_/ / /  __(__  ) ,<
\____/_/   \___/|__/|__/\__,_/_/\___/____/_/|_|
    "#
    );
}
