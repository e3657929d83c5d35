use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use shared::models::{UserCreate, UserInfo};
use shared::{ApiResponse, AppError};

use crate::db::repository::user as user_repo;
use crate::security_log;
use crate::server::ServerState;
use crate::server::auth::{CurrentUser, hash_password, verify_password};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login
///
/// Unknown usernames and wrong passwords answer identically; deleted
/// accounts get the explicit "terminated" message instead.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let user = user_repo::get_user_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(|| {
            security_log!("login_unknown_user", username = %payload.username);
            AppError::invalid_credentials()
        })?;

    if user.is_deleted {
        security_log!("login_disabled_account", username = %payload.username);
        return Err(AppError::account_disabled());
    }

    if !verify_password(&payload.password, &user.hash_pass) {
        security_log!("login_bad_password", username = %payload.username);
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User logged in");

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: user.info(),
    }))
}

/// POST /api/auth/signup
///
/// Open registration; the response carries a token so the new account
/// is signed in immediately.
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    if payload.password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let hash = hash_password(&payload.password)?;
    let user = user_repo::create_user(&state.pool, &payload, &hash).await?;

    let token = state
        .get_jwt_service()
        .generate_token(&user)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "Account created");

    Ok(ApiResponse::success_with_message(
        "Account created",
        LoginResponse {
            token,
            user: user.info(),
        },
    ))
}

/// GET /api/auth/me
///
/// Re-reads the row so role or profile changes made after the token
/// was issued show up, and a deletion locks the account out.
pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<UserInfo>, AppError> {
    let user = user_repo::get_user(&state.pool, current.id)
        .await?
        .ok_or_else(AppError::user_not_found)?;

    if user.is_deleted {
        return Err(AppError::account_disabled());
    }

    Ok(ApiResponse::success(user.info()))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; this is a log marker and a hint for clients
/// to discard theirs.
pub async fn logout(Extension(current): Extension<CurrentUser>) -> ApiResponse<()> {
    tracing::info!(user_id = current.id, username = %current.username, "User logged out");
    ApiResponse::ok()
}
