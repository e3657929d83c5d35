use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::models::{Job, JobCreate, JobStatusChange, JobUpdate, JobView};
use shared::{ApiResponse, AppError};

use crate::db::repository::job as job_repo;
use crate::server::ServerState;
use crate::server::auth::{Capability, CurrentUser};
use crate::workflow;

/// GET /api/jobs
pub async fn list_jobs(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<Vec<JobView>>, AppError> {
    current.require(Capability::ManageJobs)?;
    Ok(ApiResponse::success(job_repo::list_jobs(&state.pool).await?))
}

/// GET /api/jobs/mine
pub async fn my_jobs(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<Vec<JobView>>, AppError> {
    Ok(ApiResponse::success(
        job_repo::list_jobs_for(&state.pool, current.id).await?,
    ))
}

/// GET /api/jobs/{id}
///
/// Staff see any job; an employee only their own. Anyone else gets
/// the same answer as for a job that does not exist.
pub async fn get_job(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<Job>, AppError> {
    let job = job_repo::get_job(&state.pool, id)
        .await?
        .ok_or_else(AppError::job_not_found)?;

    if !current.is_staff() && job.assigned_to != Some(current.id) {
        return Err(AppError::job_not_found());
    }

    Ok(ApiResponse::success(job))
}

/// POST /api/jobs
pub async fn create_job(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<JobCreate>,
) -> Result<ApiResponse<Job>, AppError> {
    current.require(Capability::ManageJobs)?;

    let job = job_repo::create_job(&state.pool, &payload, current.id).await?;

    tracing::info!(
        actor_id = current.id,
        job_id = job.id,
        title = %job.title,
        assigned_to = ?job.assigned_to,
        "Job created"
    );

    Ok(ApiResponse::success_with_message("Job created", job))
}

/// PUT /api/jobs/{id}
pub async fn update_job(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<JobUpdate>,
) -> Result<ApiResponse<Job>, AppError> {
    current.require(Capability::ManageJobs)?;

    let job = job_repo::update_job(&state.pool, id, &payload).await?;

    tracing::info!(actor_id = current.id, job_id = id, "Job updated");

    Ok(ApiResponse::success(job))
}

/// DELETE /api/jobs/{id}
pub async fn delete_job(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<ApiResponse<()>, AppError> {
    current.require(Capability::ManageJobs)?;

    job_repo::delete_job(&state.pool, id).await?;

    tracing::info!(actor_id = current.id, job_id = id, "Job deleted");

    Ok(ApiResponse::ok())
}

/// PUT /api/jobs/{id}/status
///
/// The one door through which status moves. Workflow rules run against
/// the job as it currently stands, then the write happens.
pub async fn change_status(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(change): Json<JobStatusChange>,
) -> Result<ApiResponse<Job>, AppError> {
    let job = job_repo::get_job(&state.pool, id)
        .await?
        .ok_or_else(AppError::job_not_found)?;

    workflow::check_transition(&current, &job, change.status)?;

    let updated = job_repo::update_status(&state.pool, id, change.status).await?;

    tracing::info!(
        actor_id = current.id,
        job_id = id,
        from = %job.status,
        to = %change.status,
        "Job status changed"
    );

    Ok(ApiResponse::success(updated))
}
