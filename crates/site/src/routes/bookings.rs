//! Booking lifecycle and service history route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use quickcar_core::{BookingDraft, BookingSession, ServiceRecord, ServiceRecordId};
use serde_json::json;
use tower_sessions::Session;

use crate::db::BookingRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::BookingService;
use crate::state::AppState;

/// GET /api/booking
///
/// The lifecycle snapshot: which of the three states the session is in,
/// including the pending draft when one is in flight.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Json<BookingSession>, AppError> {
    let booking = BookingService::new(&state).current(&user, &session).await?;
    Ok(Json(booking))
}

/// POST /api/booking
///
/// Submit the booking form. Re-submitting while pending replaces the draft;
/// submitting after a completed payment implicitly starts a new booking.
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(draft): Json<BookingDraft>,
) -> Result<Json<serde_json::Value>, AppError> {
    let amount = BookingService::new(&state)
        .submit_booking(&user, &session, draft)
        .await?;

    Ok(Json(json!({
        "status": "pending_payment",
        "amount_paise": amount.as_paise(),
        "amount": amount.to_string(),
    })))
}

/// POST /api/booking/new
///
/// Clear a completed payment so a fresh booking can begin. No-op in the
/// other states.
pub async fn start_new(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<StatusCode, AppError> {
    BookingService::new(&state)
        .start_new_booking(&user, &session)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/services
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ServiceRecord>>, AppError> {
    let records = BookingRepository::new(state.pool())
        .list_records(user.id)
        .await?;
    Ok(Json(records))
}

/// POST /api/services/{id}/cancel
pub async fn cancel_service(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    BookingService::new(&state)
        .cancel_service(&user, ServiceRecordId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
