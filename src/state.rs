use std::sync::Arc;

use crate::services::auth_service::AuthService;
use crate::services::booking_service::BookingService;
use crate::services::feedback_service::FeedbackService;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub bookings: Arc<BookingService>,
    pub feedback: Arc<FeedbackService>,
}

impl AppState {
    pub fn new(auth: AuthService, bookings: BookingService, feedback: FeedbackService) -> Self {
        AppState {
            auth: Arc::new(auth),
            bookings: Arc::new(bookings),
            feedback: Arc::new(feedback),
        }
    }
}
