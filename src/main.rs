use std::net::SocketAddr;
use std::sync::Arc;

use okada_api::config::AppConfig;
use okada_api::database::connection::get_db_client;
use okada_api::database::store::{DocumentStore, MongoStore};
use okada_api::routes::app_router;
use okada_api::services::auth_service::AuthService;
use okada_api::services::booking_service::BookingService;
use okada_api::services::feedback_service::{FeedbackService, RatingScope};
use okada_api::services::identity_service::JwtIdentityService;
use okada_api::services::otp_session::OtpSessionStore;
use okada_api::services::rate_limit::RateLimiter;
use okada_api::services::sms_service::HubtelSmsService;
use okada_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = AppConfig::from_env();

    let db = get_db_client(&config.database_url, &config.database_name).await;
    let state = build_state(db, &config);

    let app = app_router(state);
    start_server(app, &config).await;
}

fn build_state(db: mongodb::Database, config: &AppConfig) -> AppState {
    let store: Arc<dyn DocumentStore> = Arc::new(MongoStore::new(db));

    let identity = Arc::new(JwtIdentityService::new(config.jwt_secret.clone()));
    let sms = Arc::new(HubtelSmsService::new(
        config.hubtel_base_url.clone(),
        &config.hubtel_username,
        &config.hubtel_password,
        config.hubtel_sender_id.clone(),
    ));

    let sessions = OtpSessionStore::new(store.clone(), config.otp_ttl_minutes);
    let limiter = RateLimiter::new(store.clone());

    let auth = AuthService::new(store.clone(), identity, sms, sessions, limiter);
    let bookings = BookingService::new(store.clone());
    let feedback = FeedbackService::new(store, RatingScope::parse(&config.rating_scope));

    tracing::info!("✅ Services initialized");

    AppState::new(auth, bookings, feedback)
}

async fn start_server(app: axum::Router, config: &AppConfig) {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT configuration");

    tracing::info!("🚀 Server starting on {}", addr);

    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            axum::serve(listener, app)
                .await
                .expect("Server crashed unexpectedly");
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    }
}
