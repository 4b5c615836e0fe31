//! Bearer token authentication for the admin API.
//!
//! Admin routers attach this as a `route_layer`, so every admin request
//! must carry `Authorization: Bearer <token>`. A missing, malformed,
//! unknown, or expired token is a 401; on success the resolved
//! [`AdminAuth`] lands in request extensions for handlers to read.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::models::ApiToken;
use crate::state::AppState;

/// Authentication info resolved from a valid bearer token.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub user_id: Uuid,
    pub token_id: Uuid,
}

/// Middleware that requires a valid bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(raw) = auth_header.and_then(|v| v.strip_prefix("Bearer ")) else {
        return unauthorized("missing bearer token");
    };

    let token = match ApiToken::find_by_raw(state.db(), raw).await {
        Ok(Some(t)) => t,
        Ok(None) => return unauthorized("invalid or expired bearer token"),
        Err(e) => {
            tracing::error!(error = %e, "failed to look up bearer token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(json!({
                    "error": "internal_error",
                    "message": "internal server error"
                })),
            )
                .into_response();
        }
    };

    // Best-effort bookkeeping; a failure here must not fail the request.
    let pool = state.db().clone();
    let token_id = token.id;
    tokio::spawn(async move {
        if let Err(e) = ApiToken::touch_last_used(&pool, token_id).await {
            tracing::debug!(error = %e, "failed to touch token last_used");
        }
    });

    request.extensions_mut().insert(AdminAuth {
        user_id: token.user_id,
        token_id: token.id,
    });

    next.run(request).await
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        axum::Json(json!({ "error": "unauthorized", "message": message })),
    )
        .into_response()
}
