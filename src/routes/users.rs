use axum::{routing::put, Router};

use crate::handlers::users;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/profile", put(users::update_profile))
}
