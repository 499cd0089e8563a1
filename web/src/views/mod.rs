pub mod bookings;
pub mod home;
pub mod thank_you;
