//! QuickCar Core - Shared domain library.
//!
//! This crate provides the domain model used across QuickCar components:
//! - `site` - Customer-facing booking site
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The booking lifecycle state machine lives here so
//! it can be tested in isolation from sessions, storage, and the payment
//! gateway.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, amounts, and statuses
//! - [`booking`] - Booking drafts and the session state machine
//! - [`vehicle`] - Vehicle records and garage invariant helpers
//! - [`profile`] - User profile, service history, and the booking merge policy
//! - [`payment`] - Payment session types and verification outcomes
//! - [`events`] - Domain notification events

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod booking;
pub mod events;
pub mod payment;
pub mod profile;
pub mod types;
pub mod vehicle;

pub use booking::{BookingDraft, BookingError, BookingSession, PaymentResolution};
pub use events::DomainEvent;
pub use payment::{PaymentSession, VerificationOutcome};
pub use profile::{
    ContactChannel, ServicePreferences, ServiceRecord, UserProfile, merge_booking_into_profile,
};
pub use types::*;
pub use vehicle::{GarageError, Vehicle, add_vehicle, delete_vehicle, set_default_vehicle, update_vehicle};
