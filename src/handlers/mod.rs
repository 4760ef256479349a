pub(crate) mod auth;
pub(crate) mod bookings;
pub(crate) mod drivers;
pub(crate) mod users;
