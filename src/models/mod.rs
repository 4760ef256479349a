pub mod booking;
pub mod driver;
pub mod feedback;
pub mod otp;
pub mod user;
