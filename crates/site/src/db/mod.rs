//! Database operations for the site `PostgreSQL`.
//!
//! # Schema: `site`
//!
//! ## Tables
//!
//! - `user` - Account records (email + timestamps)
//! - `user_password` - Argon2id password hashes
//! - `profile` - Customer contact details and preferences
//! - `vehicle` - Garage entries, at most one default per user
//! - `booking_draft` - The in-flight booking, one row per user
//! - `service_record` - Service history with payment amounts
//! - `feedback` - Ratings and comments on completed services
//! - `sessions` - Tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/site/migrations/` and run automatically on
//! startup via [`MIGRATOR`].

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod bookings;
pub mod feedback;
pub mod profiles;
pub mod users;

pub use bookings::BookingRepository;
pub use feedback::FeedbackRepository;
pub use profiles::ProfileRepository;
pub use users::UserRepository;

/// Embedded migrations, applied at startup.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Data corruption: {0}")]
    DataCorruption(String),

    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
