//! Admin API token management.
//!
//! Tokens are scoped to the authenticated user. The raw token value
//! appears exactly once, in the creation response.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AdminAuth;
use crate::models::ApiToken;
use crate::state::AppState;

/// Request for creating a token.
#[derive(Debug, Deserialize)]
pub struct CreateTokenRequest {
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Create the token router, guarded by the bearer-token layer.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/admin/tokens", get(list_tokens).post(create_token))
        .route("/api/admin/tokens/{id}", delete(revoke_token))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            crate::middleware::require_bearer,
        ))
}

/// GET /api/admin/tokens — the caller's tokens, without raw values.
async fn list_tokens(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
) -> AppResult<Json<serde_json::Value>> {
    let tokens = ApiToken::list_for_user(state.db(), auth.user_id).await?;
    Ok(Json(json!({ "tokens": tokens })))
}

/// POST /api/admin/tokens
async fn create_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Json(request): Json<CreateTokenRequest>,
) -> AppResult<Response> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_string()));
    }

    let (record, raw) = ApiToken::create(
        state.db(),
        auth.user_id,
        request.name.trim(),
        request.expires_at,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": raw, "record": record })),
    )
        .into_response())
}

/// DELETE /api/admin/tokens/{id}
async fn revoke_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AdminAuth>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    if !ApiToken::revoke(state.db(), id, auth.user_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Json(json!({ "ok": true })))
}
