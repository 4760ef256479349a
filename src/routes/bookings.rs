use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::bookings;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/create/:user_id/:driver_id", post(bookings::create_booking))
        .route("/get/:booking_id", get(bookings::get_booking))
        .route("/getAll", get(bookings::get_all_bookings))
        .route("/user/:user_id", get(bookings::get_user_bookings))
        .route("/driver/:driver_id", get(bookings::get_driver_bookings))
        .route("/setFeedback", post(bookings::submit_feedback))
        .route("/getFeedback/:booking_id", get(bookings::get_feedback_for_booking))
        .route("/getAllFeedback", get(bookings::get_all_feedback))
}
