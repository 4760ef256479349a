pub mod auth_service;
pub mod booking_service;
pub mod feedback_service;
pub mod identity_service;
pub mod locks;
pub mod otp_session;
pub mod rate_limit;
pub mod sms_service;
