// src/errors.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("MongoDB error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("{0} already registered")]
    AlreadyRegistered(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid OTP")]
    InvalidCode,

    #[error("Invalid requestId")]
    InvalidRequestId,

    #[error("You have a pending or accepted booking")]
    BookingConflict,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Too many OTP requests, please try again after 15 minutes")]
    RateLimited,

    #[error("Upstream provider error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_label) = match &self {
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error"),
            AppError::AlreadyRegistered(_) => (StatusCode::BAD_REQUEST, "Already registered"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            AppError::InvalidCode => (StatusCode::BAD_REQUEST, "OTP verification failed"),
            AppError::InvalidRequestId => (StatusCode::BAD_REQUEST, "Unknown OTP request"),
            AppError::BookingConflict => (StatusCode::BAD_REQUEST, "Booking conflict"),
            AppError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "Validation failed"),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded"),
            AppError::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Upstream provider error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };

        // Server-side failures are logged in full and reported generically.
        let message = if status.is_server_error() {
            tracing::error!("{}: {}", error_label, self);
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": error_label,
            "message": message,
            "success": false,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

// Manual From implementations
impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::Internal(format!("BSON encoding failed: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        AppError::Internal(format!("BSON decoding failed: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(format!("HTTP request failed: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("Token generation failed: {}", err))
    }
}

// Helper conversion functions
impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidArgument(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::Upstream(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
