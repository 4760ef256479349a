use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Driver profile plus vehicle details, stored under the identity uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub license_number: String,
    pub number_plate: String,
    pub vehicle_type: String,
    pub color: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    /// Recomputed by the feedback flow; absent until the first rating lands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDriverRequest {
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits"))]
    pub phone: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "License number is required"))]
    pub license_number: String,
    #[validate(length(min = 1, message = "Number plate is required"))]
    pub number_plate: String,
    #[validate(length(min = 1, message = "Vehicle type is required"))]
    pub vehicle_type: String,
    #[validate(length(min = 1, message = "Vehicle color is required"))]
    pub color: String,
}
