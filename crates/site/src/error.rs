//! Application error type and HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quickcar_core::{BookingError, GarageError};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Garage(#[from] GarageError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Booking(e) => match e {
                BookingError::Validation { .. } => StatusCode::BAD_REQUEST,
                BookingError::NoActiveBooking | BookingError::AlreadyPaid => StatusCode::CONFLICT,
                BookingError::VerificationFailed => StatusCode::PAYMENT_REQUIRED,
            },
            Self::Garage(e) => match e {
                GarageError::LastVehicle => StatusCode::CONFLICT,
                GarageError::UnknownVehicle(_) => StatusCode::NOT_FOUND,
            },
            Self::Auth(e) => e.status(),
            Self::Repository(e) => match e {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Server-side details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Booking(BookingError::Validation { missing }) => {
                format!("Missing required fields: {}", missing.join(", "))
            }
            Self::Booking(BookingError::VerificationFailed) => {
                "Payment verification failed. If you were charged, contact support.".to_string()
            }
            Self::Booking(e) => e.to_string(),
            Self::Garage(e) => e.to_string(),
            Self::Auth(e) => e.client_message(),
            Self::Repository(RepositoryError::NotFound) | Self::NotFound => "Not found".to_string(),
            Self::Repository(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Gateway(_) => "Payment gateway is unavailable. Please try again.".to_string(),
            Self::Repository(_) | Self::Session(_) | Self::Internal(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let body = Json(json!({ "error": self.client_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_is_bad_request() {
        let err = AppError::from(BookingError::Validation {
            missing: vec!["name", "service_type"],
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.client_message().contains("name"));
        assert!(err.client_message().contains("service_type"));
    }

    #[test]
    fn test_lifecycle_errors_are_conflicts() {
        assert_eq!(
            AppError::from(BookingError::NoActiveBooking).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(BookingError::AlreadyPaid).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(GarageError::LastVehicle).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_verification_failure_is_payment_required() {
        let err = AppError::from(BookingError::VerificationFailed);
        assert_eq!(err.status(), StatusCode::PAYMENT_REQUIRED);
        assert!(err.client_message().contains("contact support"));
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = AppError::Internal("pool exhausted at 0x7f".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.client_message().contains("pool"));
    }
}
