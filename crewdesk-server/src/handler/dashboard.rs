use axum::{Extension, extract::State};
use shared::{ApiResponse, AppError};

use crate::report::{self, DashboardStats, MyStats};
use crate::server::ServerState;
use crate::server::auth::CurrentUser;

/// GET /api/dashboard (staff only, enforced by the route guard)
pub async fn stats(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<DashboardStats>, AppError> {
    Ok(ApiResponse::success(
        report::dashboard(&state.pool, current.id).await?,
    ))
}

/// GET /api/dashboard/me
pub async fn my_stats(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiResponse<MyStats>, AppError> {
    Ok(ApiResponse::success(
        report::my_stats(&state.pool, current.id).await?,
    ))
}
