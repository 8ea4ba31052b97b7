//! Business logic services.

pub mod auth;
pub mod booking;
pub mod support;

pub use booking::BookingService;
