//! Dashboard aggregates.
//!
//! Counts come straight from the job table; the completion average is
//! the mean creation-to-verification time of currently Verified jobs,
//! reported in hours at one decimal place. No verified jobs means 0.0,
//! not an error.

use serde::{Deserialize, Serialize};
use shared::AppResult;
use shared::models::JobStatus;
use sqlx::SqlitePool;

use crate::db::repository::{job, user};

/// Whole-team dashboard, computed for a staff viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_jobs: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub submitted: i64,
    pub verified: i64,
    /// Jobs the viewer created
    pub created_by_me: i64,
    /// Active (non-deleted) accounts
    pub team_size: i64,
    pub avg_completion_hours: f64,
}

/// One employee's slice of the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyStats {
    pub total_jobs: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub submitted: i64,
    pub verified: i64,
    pub avg_completion_hours: f64,
}

/// Milliseconds to hours, rounded to one decimal place.
fn round_hours(millis: f64) -> f64 {
    (millis / 3_600_000.0 * 10.0).round() / 10.0
}

fn fold_counts(rows: &[(JobStatus, i64)]) -> (i64, i64, i64, i64, i64) {
    let mut pending = 0;
    let mut in_progress = 0;
    let mut submitted = 0;
    let mut verified = 0;
    for (status, count) in rows {
        match status {
            JobStatus::Pending => pending = *count,
            JobStatus::InProgress => in_progress = *count,
            JobStatus::Submitted => submitted = *count,
            JobStatus::Verified => verified = *count,
        }
    }
    let total = pending + in_progress + submitted + verified;
    (total, pending, in_progress, submitted, verified)
}

pub async fn dashboard(pool: &SqlitePool, viewer_id: i64) -> AppResult<DashboardStats> {
    let rows = job::status_counts(pool, None).await?;
    let (total_jobs, pending, in_progress, submitted, verified) = fold_counts(&rows);
    let avg_completion_hours = job::avg_completion_millis(pool, None)
        .await?
        .map(round_hours)
        .unwrap_or(0.0);
    let created_by_me = job::count_created_by(pool, viewer_id).await?;
    let team_size = user::count_active_users(pool).await?;

    Ok(DashboardStats {
        total_jobs,
        pending,
        in_progress,
        submitted,
        verified,
        created_by_me,
        team_size,
        avg_completion_hours,
    })
}

pub async fn my_stats(pool: &SqlitePool, user_id: i64) -> AppResult<MyStats> {
    let rows = job::status_counts(pool, Some(user_id)).await?;
    let (total_jobs, pending, in_progress, submitted, verified) = fold_counts(&rows);
    let avg_completion_hours = job::avg_completion_millis(pool, Some(user_id))
        .await?
        .map(round_hours)
        .unwrap_or(0.0);

    Ok(MyStats {
        total_jobs,
        pending,
        in_progress,
        submitted,
        verified,
        avg_completion_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::user::create_user;
    use shared::models::{JobCreate, UserCreate};

    #[test]
    fn test_round_hours_one_decimal() {
        assert_eq!(round_hours(0.0), 0.0);
        // 90 minutes
        assert_eq!(round_hours(5_400_000.0), 1.5);
        // 100 minutes -> 1.666... -> 1.7
        assert_eq!(round_hours(6_000_000.0), 1.7);
        // 2 hours 2 minutes -> 2.033... -> 2.0
        assert_eq!(round_hours(7_320_000.0), 2.0);
        // 15 seconds rounds to zero
        assert_eq!(round_hours(15_000.0), 0.0);
    }

    #[test]
    fn test_fold_counts_fills_missing_statuses() {
        let rows = vec![(JobStatus::Pending, 3), (JobStatus::Verified, 2)];
        let (total, pending, in_progress, submitted, verified) = fold_counts(&rows);
        assert_eq!(total, 5);
        assert_eq!(pending, 3);
        assert_eq!(in_progress, 0);
        assert_eq!(submitted, 0);
        assert_eq!(verified, 2);
    }

    async fn test_db() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();
        let pool = db.pool().clone();
        (dir, pool)
    }

    async fn seed_user(pool: &SqlitePool, username: &str) -> i64 {
        let create = UserCreate {
            username: username.to_string(),
            password: "pw".to_string(),
            full_name: None,
            phone: None,
            role: None,
            salary: None,
            rating: None,
        };
        create_user(pool, &create, "hash").await.unwrap().id
    }

    async fn seed_job(pool: &SqlitePool, title: &str, assigned_to: Option<i64>) -> i64 {
        let create = JobCreate {
            title: title.to_string(),
            description: None,
            assigned_to,
            due_date: None,
        };
        job::create_job(pool, &create, 1).await.unwrap().id
    }

    #[tokio::test]
    async fn test_empty_board_reports_zeroes() {
        let (_dir, pool) = test_db().await;
        let stats = dashboard(&pool, 1).await.unwrap();
        assert_eq!(stats.total_jobs, 0);
        assert_eq!(stats.created_by_me, 0);
        assert_eq!(stats.team_size, 0);
        assert_eq!(stats.avg_completion_hours, 0.0);
    }

    #[tokio::test]
    async fn test_dashboard_counts_and_average() {
        let (_dir, pool) = test_db().await;
        let worker = seed_user(&pool, "worker").await;
        let a = seed_job(&pool, "A", Some(worker)).await;
        seed_job(&pool, "B", Some(worker)).await;
        seed_job(&pool, "C", None).await;

        // Backdate one job two hours, then verify it
        sqlx::query("UPDATE job SET created_at = created_at - 7200000 WHERE id = ?")
            .bind(a)
            .execute(&pool)
            .await
            .unwrap();
        job::update_status(&pool, a, JobStatus::Verified).await.unwrap();

        // seed_job creates everything as user 1
        let stats = dashboard(&pool, 1).await.unwrap();
        assert_eq!(stats.total_jobs, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.verified, 1);
        assert_eq!(stats.created_by_me, 3);
        assert_eq!(stats.team_size, 1);
        assert_eq!(stats.avg_completion_hours, 2.0);

        let other_viewer = dashboard(&pool, 999).await.unwrap();
        assert_eq!(other_viewer.created_by_me, 0);
        assert_eq!(other_viewer.total_jobs, 3);
    }

    #[tokio::test]
    async fn test_my_stats_scoped_to_assignee() {
        let (_dir, pool) = test_db().await;
        let ana = seed_user(&pool, "ana").await;
        let bob = seed_user(&pool, "bob").await;
        seed_job(&pool, "Ana's", Some(ana)).await;
        let bobs = seed_job(&pool, "Bob's", Some(bob)).await;
        job::update_status(&pool, bobs, JobStatus::Verified).await.unwrap();

        let stats = my_stats(&pool, ana).await.unwrap();
        assert_eq!(stats.total_jobs, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.verified, 0);
        assert_eq!(stats.avg_completion_hours, 0.0);
    }
}
