//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/register           - Create an account
//! POST /api/auth/login              - Log in
//! POST /api/auth/logout             - Log out (resets the whole session)
//! GET  /api/auth/me                 - Current user
//!
//! # Profile (requires auth)
//! GET  /api/profile                 - Assembled profile with vehicles and history
//! PUT  /api/profile                 - Update contact details
//! PUT  /api/profile/preferences     - Update notification preferences
//!
//! # Garage (requires auth)
//! GET    /api/vehicles              - List vehicles
//! POST   /api/vehicles              - Add a vehicle (first one becomes default)
//! PUT    /api/vehicles/{id}         - Update a vehicle
//! DELETE /api/vehicles/{id}         - Delete a vehicle (never the last one)
//! POST   /api/vehicles/{id}/default - Make a vehicle the default
//!
//! # Booking lifecycle (requires auth)
//! GET  /api/booking                 - Current lifecycle state
//! POST /api/booking                 - Submit the booking form
//! POST /api/booking/new             - Clear a completed payment
//!
//! # Payments (requires auth)
//! POST /api/payments/checkout       - Create a gateway order
//! POST /api/payments/confirm        - Verify a checkout confirmation
//! POST /api/payments/cancel         - Dismissed checkout
//!
//! # Service history (requires auth)
//! GET  /api/services                - Service history
//! POST /api/services/{id}/cancel    - Cancel a confirmed service
//! POST /api/services/{id}/feedback  - Rate a service
//!
//! # Support
//! POST /api/chat                    - Support chat responder
//! ```

pub mod auth;
pub mod bookings;
pub mod chat;
pub mod feedback;
pub mod health;
pub mod payments;
pub mod profile;
pub mod vehicles;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the auth API router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the profile router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show).put(profile::update))
        .route("/preferences", put(profile::update_preferences))
}

/// Create the garage router.
pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(vehicles::index).post(vehicles::create))
        .route("/{id}", put(vehicles::update).delete(vehicles::delete))
        .route("/{id}/default", post(vehicles::set_default))
}

/// Create the booking lifecycle router.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::show).post(bookings::submit))
        .route("/new", post(bookings::start_new))
}

/// Create the payments router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(payments::create_checkout))
        .route("/confirm", post(payments::confirm))
        .route("/cancel", post(payments::cancel))
}

/// Create the service history router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::history))
        .route("/{id}/cancel", post(bookings::cancel_service))
        .route("/{id}/feedback", post(feedback::submit))
}

/// Create the health router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::liveness))
        .route("/ready", get(health::readiness))
}
