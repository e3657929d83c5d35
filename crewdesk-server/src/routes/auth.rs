//! Authentication Routes

use axum::{Router, routing::get, routing::post};

use crate::handler::auth;
use crate::server::ServerState;

/// Build authentication router
/// - /api/auth/login, /api/auth/signup: public (no auth required)
/// - /api/auth/me, /api/auth/logout: protected (require auth)
pub fn router() -> Router<ServerState> {
    Router::new()
        // Public routes - skipped by the auth middleware
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/signup", post(auth::signup))
        // Protected routes - require authentication
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
}
