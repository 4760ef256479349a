use axum::{routing::post, Router};

use crate::handlers::auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/signup", post(auth::register_user))
        .route("/user/login", post(auth::login))
        .route("/driver/signup", post(auth::register_driver))
        .route("/verify-otp", post(auth::verify_otp))
        .route("/resend-otp", post(auth::resend_otp))
        .route("/logout", post(auth::logout))
}
