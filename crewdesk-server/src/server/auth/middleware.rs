use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, header},
    middleware::Next,
    response::Response,
};
use shared::{AppError, ErrorCode};

use super::jwt::{CurrentUser, JwtError, JwtService};
use crate::security_log;
use crate::server::state::ServerState;

/// Routes reachable without a token.
const PUBLIC_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/signup"];

/// Global authentication gate.
///
/// Validates the bearer token on every `/api/` request except the
/// public routes, then parks the resolved [`CurrentUser`] in request
/// extensions for handlers and the role guards downstream.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight never carries credentials
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    if PUBLIC_ROUTES.contains(&path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = JwtService::extract_from_header(auth_header).map_err(|e| {
        security_log!("missing_token", uri = %req.uri(), error = %e);
        AppError::not_authenticated()
    })?;

    let claims = state
        .get_jwt_service()
        .validate_token(token)
        .map_err(|e| match e {
            JwtError::ExpiredToken => {
                security_log!("expired_token", uri = %req.uri());
                AppError::token_expired()
            }
            other => {
                security_log!("invalid_token", uri = %req.uri(), error = %other);
                AppError::invalid_token(other.to_string())
            }
        })?;

    let user =
        CurrentUser::try_from(claims).map_err(|e| AppError::invalid_token(e.to_string()))?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Route guard: Supervisor or Admin only. Must run after [`require_auth`].
pub async fn require_staff(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;

    if !user.is_staff() {
        security_log!("staff_required", uri = %req.uri(), username = %user.username);
        return Err(AppError::new(ErrorCode::StaffRequired));
    }

    Ok(next.run(req).await)
}
