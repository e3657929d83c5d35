use axum::Router;
use axum::routing::{get, put};

use crate::handler::jobs;
use crate::server::ServerState;

/// Jobs router - authentication required.
///
/// Employees reach their own jobs and status moves here; board-wide
/// access is gated per handler by capability.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/api/jobs/mine", get(jobs::my_jobs))
        .route(
            "/api/jobs/{id}",
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        .route("/api/jobs/{id}/status", put(jobs::change_status))
}
