// config.rs
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub hubtel_base_url: String,
    pub hubtel_username: String,
    pub hubtel_password: String,
    pub hubtel_sender_id: String,
    pub otp_ttl_minutes: i64,
    pub rating_scope: String,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv().ok();

        AppConfig {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "okadadb".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            hubtel_base_url: env::var("HUBTEL_BASE_URL")
                .unwrap_or_else(|_| "https://api-devp-otp-2704.hubtel.com".to_string()),
            hubtel_username: env::var("HUBTEL_USERNAME")
                .expect("HUBTEL_USERNAME must be set"),
            hubtel_password: env::var("HUBTEL_PASSWORD")
                .expect("HUBTEL_PASSWORD must be set"),
            hubtel_sender_id: env::var("HUBTEL_SENDER_ID")
                .unwrap_or_else(|_| "Okada".to_string()),
            otp_ttl_minutes: env::var("OTP_TTL_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("OTP_TTL_MINUTES must be a number"),
            rating_scope: env::var("RATING_SCOPE")
                .unwrap_or_else(|_| "booking".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a number"),
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
        }
    }
}
