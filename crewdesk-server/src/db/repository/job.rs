//! Job queries.
//!
//! Status moves are unguarded here; callers run the workflow rules
//! first. The one data rule this layer owns: `completed_at` is set
//! exactly when the row is Verified. Entering Verified stamps the
//! current time (again, on re-verification), and moving anywhere else
//! clears it.

use chrono::NaiveDate;
use shared::models::{Job, JobCreate, JobStatus, JobUpdate, JobView};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use super::db_error;

const VIEW_SELECT: &str = "SELECT j.id, j.title, j.description, j.status, j.assigned_to, \
     u.username AS assignee_name, j.created_by, j.due_date, j.completed_at, \
     j.created_at, j.updated_at \
     FROM job j LEFT JOIN user u ON u.id = j.assigned_to AND u.is_deleted = 0";

pub async fn get_job(pool: &SqlitePool, id: i64) -> AppResult<Option<Job>> {
    sqlx::query_as::<_, Job>("SELECT * FROM job WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)
}

/// Full board, newest first, with assignee names resolved.
pub async fn list_jobs(pool: &SqlitePool) -> AppResult<Vec<JobView>> {
    sqlx::query_as::<_, JobView>(&format!("{VIEW_SELECT} ORDER BY j.created_at DESC"))
        .fetch_all(pool)
        .await
        .map_err(db_error)
}

/// Jobs assigned to one user, newest first.
pub async fn list_jobs_for(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<JobView>> {
    sqlx::query_as::<_, JobView>(&format!(
        "{VIEW_SELECT} WHERE j.assigned_to = ? ORDER BY j.created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)
}

fn validate_due_date(date: &str) -> AppResult<()> {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(_) => Ok(()),
        Err(_) => Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "Due date must be an ISO date (YYYY-MM-DD)",
        )
        .with_detail("due_date", date)),
    }
}

/// Assignees must be existing, non-deleted accounts.
async fn ensure_assignable(pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM user WHERE id = ? AND is_deleted = 0")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?;
    if row.is_some() {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::JobNotAssignable))
    }
}

pub async fn create_job(pool: &SqlitePool, create: &JobCreate, created_by: i64) -> AppResult<Job> {
    let title = create.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    if let Some(assignee) = create.assigned_to {
        ensure_assignable(pool, assignee).await?;
    }
    if let Some(due) = create.due_date.as_deref() {
        validate_due_date(due)?;
    }

    let id = snowflake_id();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO job (id, title, description, status, assigned_to, created_by, due_date, completed_at, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)",
    )
    .bind(id)
    .bind(title)
    .bind(create.description.as_deref().unwrap_or(""))
    .bind(JobStatus::Pending)
    .bind(create.assigned_to)
    .bind(created_by)
    .bind(create.due_date.as_deref())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(db_error)?;

    get_job(pool, id).await?.ok_or_else(AppError::job_not_found)
}

/// Partial edit of title, description, assignee or due date. Status
/// never moves through here.
pub async fn update_job(pool: &SqlitePool, id: i64, update: &JobUpdate) -> AppResult<Job> {
    if let Some(assignee) = update.assigned_to {
        ensure_assignable(pool, assignee).await?;
    }
    if let Some(due) = update.due_date.as_deref() {
        validate_due_date(due)?;
    }

    let result = sqlx::query(
        "UPDATE job SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            assigned_to = COALESCE(?, assigned_to),
            due_date = COALESCE(?, due_date),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(update.title.as_deref())
    .bind(update.description.as_deref())
    .bind(update.assigned_to)
    .bind(update.due_date.as_deref())
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::job_not_found());
    }

    get_job(pool, id).await?.ok_or_else(AppError::job_not_found)
}

/// Move a job to a new status.
///
/// Keeps `completed_at` in lockstep with the status: a Verified target
/// stamps the current time (even when the job was verified before), any
/// other target clears the stamp.
pub async fn update_status(pool: &SqlitePool, id: i64, status: JobStatus) -> AppResult<Job> {
    let now = now_millis();
    let completed_at = (status == JobStatus::Verified).then_some(now);

    let result =
        sqlx::query("UPDATE job SET status = ?, completed_at = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(completed_at)
            .bind(now)
            .bind(id)
            .execute(pool)
            .await
            .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::job_not_found());
    }

    get_job(pool, id).await?.ok_or_else(AppError::job_not_found)
}

/// Hard delete.
pub async fn delete_job(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM job WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::job_not_found());
    }
    Ok(())
}

/// Per-status counts, optionally scoped to one assignee. Statuses with
/// no jobs are absent from the result.
pub async fn status_counts(
    pool: &SqlitePool,
    assignee: Option<i64>,
) -> AppResult<Vec<(JobStatus, i64)>> {
    let rows: Vec<(JobStatus, i64)> = match assignee {
        Some(user_id) => {
            sqlx::query_as(
                "SELECT status, COUNT(*) FROM job WHERE assigned_to = ? GROUP BY status",
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as("SELECT status, COUNT(*) FROM job GROUP BY status")
                .fetch_all(pool)
                .await
        }
    }
    .map_err(db_error)?;
    Ok(rows)
}

/// Mean wall-clock time from creation to verification, in milliseconds.
/// None when nothing has been verified yet.
pub async fn avg_completion_millis(
    pool: &SqlitePool,
    assignee: Option<i64>,
) -> AppResult<Option<f64>> {
    let row: (Option<f64>,) = match assignee {
        Some(user_id) => {
            sqlx::query_as(
                "SELECT AVG(CAST(completed_at - created_at AS REAL)) FROM job
                 WHERE status = ? AND completed_at IS NOT NULL AND assigned_to = ?",
            )
            .bind(JobStatus::Verified)
            .bind(user_id)
            .fetch_one(pool)
            .await
        }
        None => {
            sqlx::query_as(
                "SELECT AVG(CAST(completed_at - created_at AS REAL)) FROM job
                 WHERE status = ? AND completed_at IS NOT NULL",
            )
            .bind(JobStatus::Verified)
            .fetch_one(pool)
            .await
        }
    }
    .map_err(db_error)?;
    Ok(row.0)
}

/// How many jobs one user has created.
pub async fn count_created_by(pool: &SqlitePool, user_id: i64) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM job WHERE created_by = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(db_error)?;
    Ok(row.0)
}
