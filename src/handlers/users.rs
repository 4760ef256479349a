use axum::{extract::State, response::Json};
use mongodb::bson;
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::user::UpdateProfileRequest;
use crate::state::AppState;

pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Value>> {
    let patch = bson::to_document(&payload.profile_data)
        .map_err(|_| AppError::invalid("profileData must be an object"))?;

    state.auth.update_profile(&payload.uid, patch).await?;
    Ok(Json(json!({ "message": "Profile updated" })))
}
