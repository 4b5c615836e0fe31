//! Newsletter subscription routes.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};
use crate::models::Subscriber;
use crate::state::AppState;

/// Subscribe/unsubscribe request body.
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Create the newsletter router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/newsletter", post(subscribe))
        .route("/api/newsletter/unsubscribe", post(unsubscribe))
}

/// POST /api/newsletter
///
/// A duplicate subscription is absorbed and still reported as success.
async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> AppResult<Json<Value>> {
    let email = validate_email(&request.email)?;
    Subscriber::subscribe(state.db(), email).await?;

    Ok(Json(json!({ "ok": true })))
}

/// POST /api/newsletter/unsubscribe
///
/// Unsubscribing an unknown address is still success: the caller's goal
/// state holds either way.
async fn unsubscribe(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> AppResult<Json<Value>> {
    let email = validate_email(&request.email)?;
    Subscriber::unsubscribe(state.db(), email).await?;

    Ok(Json(json!({ "ok": true })))
}

/// Minimal shape check; the mail provider does the real validation.
fn validate_email(email: &str) -> Result<&str, AppError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || email.len() > 254 {
        return Err(AppError::BadRequest("a valid email is required".to_string()));
    }

    Ok(email)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_addresses() {
        assert_eq!(validate_email(" dev@example.com ").unwrap(), "dev@example.com");
    }

    #[test]
    fn rejects_garbage() {
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        let long = format!("{}@x.com", "a".repeat(300));
        assert!(validate_email(&long).is_err());
    }
}
