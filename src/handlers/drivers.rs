use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::errors::{AppError, Result};
use crate::models::booking::{BookingResponse, RespondRequest};
use crate::state::AppState;

pub async fn get_driver_earnings(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<Value>> {
    match state.bookings.earnings(&driver_id).await? {
        Some(total) => Ok(Json(json!({
            "driverId": driver_id,
            "totalEarnings": total,
        }))),
        None => Err(AppError::not_found("No earnings found for this driver")),
    }
}

pub async fn get_ride_requests(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<Vec<BookingResponse>>> {
    let requests = state.bookings.pending_requests(&driver_id).await?;
    if requests.is_empty() {
        return Err(AppError::not_found("No ride requests found"));
    }

    Ok(Json(requests.into_iter().map(BookingResponse::from).collect()))
}

pub async fn track_ride_status(
    State(state): State<AppState>,
    Path((driver_id, ride_id)): Path<(String, String)>,
) -> Result<Json<BookingResponse>> {
    let booking = state.bookings.track_status(&driver_id, &ride_id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

pub async fn respond_to_ride_request(
    State(state): State<AppState>,
    Path((driver_id, ride_id)): Path<(String, String)>,
    Json(payload): Json<RespondRequest>,
) -> Result<Json<Value>> {
    let status = state
        .bookings
        .respond(&driver_id, &ride_id, &payload.response)
        .await?;
    Ok(Json(json!({
        "message": format!("Ride {} successfully", status.as_str()),
    })))
}

pub async fn complete_ride(
    State(state): State<AppState>,
    Path((driver_id, ride_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    state.bookings.complete(&driver_id, &ride_id).await?;
    Ok(Json(json!({ "message": "Ride completed successfully" })))
}
