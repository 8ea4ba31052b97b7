//! Profile route handlers.

use axum::{Json, extract::State, http::StatusCode};
use quickcar_core::{ServicePreferences, UserProfile};
use serde::Deserialize;

use crate::db::profiles::ProfileDetails;
use crate::db::{BookingRepository, ProfileRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Profile update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// GET /api/profile
///
/// Assembles the full profile from its tables: contact details, the garage,
/// and the service history.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<UserProfile>, AppError> {
    let profiles = ProfileRepository::new(state.pool());
    let bookings = BookingRepository::new(state.pool());

    let details = profiles.get(user.id).await?.unwrap_or_default();
    let vehicles = profiles.list_vehicles(user.id).await?;
    let service_history = bookings.list_records(user.id).await?;

    Ok(Json(UserProfile {
        name: details.name,
        email: user.email.to_string(),
        phone: details.phone,
        address: details.address,
        vehicles,
        service_history,
        preferences: details.preferences,
    }))
}

/// PUT /api/profile
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<StatusCode, AppError> {
    let profiles = ProfileRepository::new(state.pool());
    let existing = profiles.get(user.id).await?.unwrap_or_default();

    profiles
        .upsert(
            user.id,
            &ProfileDetails {
                name: body.name,
                phone: body.phone,
                address: body.address,
                preferences: existing.preferences,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/profile/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(preferences): Json<ServicePreferences>,
) -> Result<StatusCode, AppError> {
    let profiles = ProfileRepository::new(state.pool());
    let existing = profiles.get(user.id).await?.unwrap_or_default();

    profiles
        .upsert(
            user.id,
            &ProfileDetails {
                preferences,
                ..existing
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
