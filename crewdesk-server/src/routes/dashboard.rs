use axum::Router;
use axum::routing::get;

use crate::handler::dashboard;
use crate::server::ServerState;
use crate::server::auth::require_staff;

/// Dashboard router
/// - /api/dashboard: staff only
/// - /api/dashboard/me: any authenticated user
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/dashboard", get(dashboard::stats))
        .route_layer(axum::middleware::from_fn(require_staff))
        .route("/api/dashboard/me", get(dashboard::my_stats))
}
