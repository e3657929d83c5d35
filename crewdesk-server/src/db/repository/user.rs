//! User directory queries.
//!
//! Accounts are soft-deleted: `is_deleted = 1` hides a row from
//! listings and logins but keeps the username reserved and old job
//! references resolvable.

use shared::models::{Role, User, UserCreate, UserUpdate};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use super::db_error;

/// Fetch by id, deleted rows included.
pub async fn get_user(pool: &SqlitePool, id: i64) -> AppResult<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM user WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error)
}

/// Fetch by username, deleted rows included. Login needs the deleted
/// row back so it can answer "account disabled" rather than "no such
/// user".
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM user WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(db_error)
}

/// True when any row, active or deleted, holds the username.
pub async fn username_exists(pool: &SqlitePool, username: &str) -> AppResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM user WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(db_error)?;
    Ok(row.is_some())
}

/// Active roster, optionally narrowed to one role.
pub async fn list_active(pool: &SqlitePool, role_filter: Option<Role>) -> AppResult<Vec<User>> {
    match role_filter {
        Some(role) => {
            sqlx::query_as::<_, User>(
                "SELECT * FROM user WHERE is_deleted = 0 AND role = ? ORDER BY username",
            )
            .bind(role)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, User>("SELECT * FROM user WHERE is_deleted = 0 ORDER BY username")
                .fetch_all(pool)
                .await
        }
    }
    .map_err(db_error)
}

/// Previous contributors: soft-deleted accounts only.
pub async fn list_deleted(pool: &SqlitePool) -> AppResult<Vec<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM user WHERE is_deleted = 1 ORDER BY username")
        .fetch_all(pool)
        .await
        .map_err(db_error)
}

pub async fn count_active_users(pool: &SqlitePool) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user WHERE is_deleted = 0")
        .fetch_one(pool)
        .await
        .map_err(db_error)?;
    Ok(row.0)
}

fn validate_rating(rating: i64) -> AppResult<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::new(ErrorCode::RatingOutOfRange))
    }
}

fn validate_salary(salary: f64) -> AppResult<()> {
    if salary.is_finite() && salary >= 0.0 {
        Ok(())
    } else {
        Err(AppError::validation("Salary must be a non-negative number"))
    }
}

/// Insert a new account. The caller supplies the password hash;
/// omitted fields fall back to role defaults.
pub async fn create_user(
    pool: &SqlitePool,
    create: &UserCreate,
    hash_pass: &str,
) -> AppResult<User> {
    let username = create.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username_exists(pool, username).await? {
        return Err(AppError::username_taken(username));
    }

    let role = create.role.unwrap_or_default();
    let salary = create.salary.unwrap_or_else(|| role.default_salary());
    let rating = create.rating.unwrap_or(5);
    validate_rating(rating)?;
    validate_salary(salary)?;

    let id = snowflake_id();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO user (id, username, full_name, phone, hash_pass, role, salary, rating, is_deleted, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(username)
    .bind(create.full_name.as_deref().unwrap_or(""))
    .bind(create.phone.as_deref().unwrap_or(""))
    .bind(hash_pass)
    .bind(role)
    .bind(salary)
    .bind(rating)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(db_error)?;

    get_user(pool, id).await?.ok_or_else(AppError::user_not_found)
}

/// Partial update over an active account. Omitted fields keep their
/// values; the caller has already narrowed the patch to what its role
/// may touch.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    update: &UserUpdate,
    hash_pass: Option<&str>,
) -> AppResult<User> {
    if let Some(rating) = update.rating {
        validate_rating(rating)?;
    }
    if let Some(salary) = update.salary {
        validate_salary(salary)?;
    }

    let result = sqlx::query(
        "UPDATE user SET
            full_name = COALESCE(?, full_name),
            phone = COALESCE(?, phone),
            role = COALESCE(?, role),
            hash_pass = COALESCE(?, hash_pass),
            salary = COALESCE(?, salary),
            rating = COALESCE(?, rating),
            updated_at = ?
         WHERE id = ? AND is_deleted = 0",
    )
    .bind(update.full_name.as_deref())
    .bind(update.phone.as_deref())
    .bind(update.role)
    .bind(hash_pass)
    .bind(update.salary)
    .bind(update.rating)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::user_not_found());
    }

    get_user(pool, id).await?.ok_or_else(AppError::user_not_found)
}

/// Soft delete. Deleting an already-deleted account succeeds.
pub async fn soft_delete_user(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("UPDATE user SET is_deleted = 1, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::user_not_found());
    }
    Ok(())
}

/// Undo a soft delete. Restoring an active account succeeds.
pub async fn restore_user(pool: &SqlitePool, id: i64) -> AppResult<()> {
    let result = sqlx::query("UPDATE user SET is_deleted = 0, updated_at = ? WHERE id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(AppError::user_not_found());
    }
    Ok(())
}
