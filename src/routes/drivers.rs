use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::drivers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/earnings/:driver_id", get(drivers::get_driver_earnings))
        .route("/requests/:driver_id", get(drivers::get_ride_requests))
        .route(
            "/status/:driver_id/:ride_id",
            get(drivers::track_ride_status),
        )
        .route(
            "/respond/:driver_id/:ride_id",
            post(drivers::respond_to_ride_request),
        )
        .route(
            "/complete/:driver_id/:ride_id",
            post(drivers::complete_ride),
        )
}
