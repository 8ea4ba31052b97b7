//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::info;

use crate::db::{BookingRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::{OptionalAuth, RequireAuth, clear_session_user, set_session_user};
use crate::models::session::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register_with_password(&body.email, &body.password)
        .await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_session_user(&session, &current).await?;

    info!(user_id = %user.id, "account created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": user.id, "email": user.email })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.login_with_password(&body.email, &body.password).await?;

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    set_session_user(&session, &current).await?;

    Ok(Json(json!({ "id": user.id, "email": user.email })))
}

/// POST /api/auth/logout
///
/// Resets the whole booking lifecycle: the in-flight draft is discarded and
/// the session is flushed, taking the payment-completed flag and any pending
/// order reference with it.
pub async fn logout(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<StatusCode, AppError> {
    if let Some(user) = user {
        BookingRepository::new(state.pool())
            .delete_draft(user.id)
            .await?;
    }
    clear_session_user(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
///
/// Re-reads the account row so a stale session for a deleted account turns
/// into a 404 instead of echoing the cookie back.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<serde_json::Value>, AppError> {
    let account = UserRepository::new(state.pool())
        .get_by_id(user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(json!({
        "id": account.id,
        "email": account.email,
        "created_at": account.created_at,
    })))
}
