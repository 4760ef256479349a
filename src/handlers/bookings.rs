use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::booking::{BookingResponse, CreateBookingRequest};
use crate::models::feedback::{FeedbackResponse, SubmitFeedbackRequest};
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<AppState>,
    Path((user_id, driver_id)): Path<(String, String)>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    let booking_id = state
        .bookings
        .create(
            &user_id,
            &driver_id,
            payload.fare,
            payload.pickup_address,
            payload.drop_off_address,
            payload.notes,
        )
        .await?;

    Ok(Json(json!({
        "message": "Booking confirmed",
        "bookingId": booking_id,
    })))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingResponse>> {
    let booking = state.bookings.get(&booking_id).await?;
    Ok(Json(BookingResponse::from(booking)))
}

pub async fn get_all_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingResponse>>> {
    let bookings = state.bookings.list_all().await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

pub async fn get_user_bookings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let bookings = state.bookings.list_by_user(&user_id).await?;
    if bookings.is_empty() {
        return Ok(Json(json!({ "message": "No bookings found for this user" })).into_response());
    }

    let bookings: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(bookings).into_response())
}

pub async fn get_driver_bookings(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Response> {
    let bookings = state.bookings.list_by_driver(&driver_id).await?;
    if bookings.is_empty() {
        return Ok(Json(json!({ "message": "No bookings found for this driver" })).into_response());
    }

    let bookings: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(bookings).into_response())
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> Result<Json<Value>> {
    payload
        .validate()
        .map_err(|e| AppError::invalid(format!("Validation error: {}", e)))?;

    state
        .feedback
        .submit(&payload.booking_id, payload.rating, payload.comment)
        .await?;
    Ok(Json(json!({ "message": "Feedback submitted successfully" })))
}

pub async fn get_feedback_for_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Value>> {
    let feedback = state.feedback.get_for_booking(&booking_id).await?;
    let feedback: Vec<FeedbackResponse> =
        feedback.into_iter().map(FeedbackResponse::from).collect();
    Ok(Json(json!({ "feedback": feedback })))
}

pub async fn get_all_feedback(State(state): State<AppState>) -> Result<Json<Value>> {
    let feedback = state.feedback.get_all().await?;
    let feedback: Vec<FeedbackResponse> =
        feedback.into_iter().map(FeedbackResponse::from).collect();
    Ok(Json(json!({ "feedback": feedback })))
}
