use serde::{Deserialize, Serialize};
use validator::Validate;

/// Lifecycle: pending -> accepted -> completed, or pending -> declined.
/// Declined and completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

impl BookingStatus {
    /// Active bookings block the rider from creating another one.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
            BookingStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub driver_id: String,
    pub fare: f64,
    pub pickup_address: String,
    pub drop_off_address: String,
    #[serde(default)]
    pub notes: String,
    pub status: BookingStatus,
}

/// Rider-side pointer to their latest booking, kept in step with the
/// lifecycle so the one-active-booking check is a single document read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBooking {
    pub status: BookingStatus,
    pub booking_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub fare: f64,
    #[validate(length(min = 1, message = "Pickup address is required"))]
    pub pickup_address: String,
    #[validate(length(min = 1, message = "Drop-off address is required"))]
    pub drop_off_address: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub user_id: String,
    pub driver_id: String,
    pub fare: f64,
    pub pickup_address: String,
    pub drop_off_address: String,
    pub notes: String,
    pub status: BookingStatus,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        BookingResponse {
            id: booking.id.unwrap_or_default(),
            user_id: booking.user_id,
            driver_id: booking.driver_id,
            fare: booking.fare,
            pickup_address: booking.pickup_address,
            drop_off_address: booking.drop_off_address,
            notes: booking.notes,
            status: booking.status,
        }
    }
}
