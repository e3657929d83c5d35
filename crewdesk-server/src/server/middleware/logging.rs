use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::server::auth::CurrentUser;

/// Per-request access log.
///
/// Runs inside the auth layer so the resolved user is visible; the
/// request id comes from the `x-request-id` header when a proxy set
/// one upstream.
pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .map(|u| format!("{}({})", u.username, u.id))
        .unwrap_or_else(|| "-".to_owned());

    let response = next.run(req).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        tracing::error!(
            %request_id, %method, %path, status = %status.as_u16(), latency_ms, %user, %user_agent,
            "request failed"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            %request_id, %method, %path, status = %status.as_u16(), latency_ms, %user,
            "request rejected"
        );
    } else {
        tracing::info!(
            %request_id, %method, %path, status = %status.as_u16(), latency_ms, %user,
            "request"
        );
    }

    response
}
