use axum::Router;
use axum::routing::{get, post};

use crate::handler::team;
use crate::server::ServerState;
use crate::server::auth::require_staff;

/// Team router - requires authentication and staff access.
///
/// Admin-only operations inside (create, delete, restore, import,
/// the deleted listing) are enforced per handler.
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/team", get(team::list_team).post(team::create_member))
        .route("/api/team/deleted", get(team::list_deleted))
        .route(
            "/api/team/{id}",
            get(team::get_member)
                .put(team::update_member)
                .delete(team::delete_member),
        )
        .route("/api/team/{id}/restore", post(team::restore_member))
        .route("/api/team/import", post(team::import_team))
        .route_layer(axum::middleware::from_fn(require_staff))
}
