use super::error::ApiError;
use crate::registration::{self, Registration};
use crate::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use validator::{Validate, ValidateEmail, ValidationError};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPlayerRequest {
    #[validate(custom(function = "not_blank"))]
    pub user_name: String,
    #[validate(custom(function = "valid_email"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub ext_user_id: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Callers may send surrounding whitespace; the address itself must be valid.
fn valid_email(value: &str) -> Result<(), ValidationError> {
    if !value.trim().validate_email() {
        return Err(ValidationError::new("email"));
    }
    Ok(())
}

/// POST /register-player/
pub async fn register_player(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterPlayerRequest>, JsonRejection>,
) -> Result<Json<Registration>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::Validation(e.body_text()))?;
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    tracing::info!("Received registration request for {}", request.ext_user_id.trim());

    let registration = registration::register(
        &state.db_pool,
        &request.user_name,
        &request.email,
        &request.ext_user_id,
    )
    .await?;

    Ok(Json(registration))
}

/// POST /test_registration
pub async fn test_registration() -> Json<Value> {
    tracing::info!("Test registration endpoint hit");
    Json(json!({ "message": "Registration test triggered" }))
}
