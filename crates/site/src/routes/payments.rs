//! Payment route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::razorpay::PaymentConfirmation;
use crate::services::BookingService;
use crate::services::booking::CheckoutContext;
use crate::state::AppState;

/// POST /api/payments/checkout
///
/// Create a gateway order for the pending booking. The state machine guards
/// the step: no booking means "book first", an already-paid booking means
/// "start a new booking".
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<Json<CheckoutContext>, AppError> {
    let context = BookingService::new(&state)
        .create_checkout(&user, &session)
        .await?;
    Ok(Json(context))
}

/// POST /api/payments/confirm
///
/// Verify the checkout confirmation. Only a matching signature over the
/// pinned order completes the booking; everything else keeps the draft for
/// retry.
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = BookingService::new(&state)
        .confirm_payment(&user, &session, &confirmation)
        .await?;

    Ok(Json(json!({
        "status": "payment_completed",
        "service_id": record.service_id,
        "amount_paise": record.amount.as_paise(),
    })))
}

/// POST /api/payments/cancel
///
/// The customer dismissed the checkout. Not an error; the draft stays in
/// place for retry.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
) -> Result<StatusCode, AppError> {
    BookingService::new(&state)
        .cancel_checkout(&user, &session)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
