//! Authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] quickcar_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::WeakPassword(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserAlreadyExists => StatusCode::CONFLICT,
            Self::Repository(_) | Self::PasswordHash => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; database details stay server-side.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => format!("Invalid email: {e}"),
            Self::InvalidCredentials => "Invalid email or password".to_string(),
            Self::UserAlreadyExists => "An account with this email already exists".to_string(),
            Self::WeakPassword(msg) => msg.clone(),
            Self::Repository(_) | Self::PasswordHash => {
                "Something went wrong. Please try again later.".to_string()
            }
        }
    }
}
