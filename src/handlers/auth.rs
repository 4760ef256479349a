use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::driver::RegisterDriverRequest;
use crate::models::user::{LoginRequest, RegisterUserRequest, ResendOtpRequest, VerifyOtpRequest};
use crate::state::AppState;

pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    let request_id = state.auth.register_user(payload).await?;
    Ok(Json(json!({ "requestId": request_id })))
}

pub async fn register_driver(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDriverRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    let request_id = state.auth.register_driver(payload).await?;
    Ok(Json(json!({ "requestId": request_id })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    let request_id = state.auth.login(&payload.phone).await?;
    Ok(Json(json!({ "requestId": request_id })))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    let token = state
        .auth
        .verify(&payload.phone, &payload.request_id, &payload.code)
        .await?;
    Ok(Json(json!({ "token": token })))
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(payload): Json<ResendOtpRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    state.auth.resend(&payload.request_id).await?;
    Ok(Json(json!({ "message": "OTP resent successfully" })))
}

/// Sessions are stateless JWTs, so logout is a client-side discard; the
/// endpoint just acknowledges.
pub async fn logout() -> Json<Value> {
    Json(json!({ "message": "Logged out successfully" }))
}
