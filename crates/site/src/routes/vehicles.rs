//! Garage route handlers.
//!
//! The garage invariants (exactly one default in a non-empty garage, never
//! delete the last vehicle) live in `quickcar_core::vehicle`; handlers load
//! the garage, apply the pure mutation, and mirror the result into the
//! database.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use quickcar_core::{Vehicle, VehicleId, delete_vehicle, set_default_vehicle};
use serde::Deserialize;

use crate::db::ProfileRepository;
use crate::db::profiles::NewVehicle;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Vehicle create/update request body.
#[derive(Debug, Deserialize)]
pub struct VehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub color: String,
    #[serde(default)]
    pub mileage: i32,
    #[serde(default)]
    pub is_default: bool,
}

impl VehicleRequest {
    fn into_new_vehicle(self) -> NewVehicle {
        NewVehicle {
            make: self.make,
            model: self.model,
            year: self.year,
            license_plate: self.license_plate.to_uppercase(),
            color: self.color,
            mileage: self.mileage,
        }
    }
}

/// GET /api/vehicles
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let profiles = ProfileRepository::new(state.pool());
    Ok(Json(profiles.list_vehicles(user.id).await?))
}

/// POST /api/vehicles
///
/// The first vehicle always becomes the default; an explicit default flag
/// displaces the previous default.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<VehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let profiles = ProfileRepository::new(state.pool());
    let garage = profiles.list_vehicles(user.id).await?;

    let is_default = garage.is_empty() || body.is_default;
    let vehicle = profiles
        .insert_vehicle(user.id, &body.into_new_vehicle(), is_default)
        .await?;

    Ok((StatusCode::CREATED, Json(vehicle)))
}

/// PUT /api/vehicles/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<VehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let vehicle_id = VehicleId::new(id);
    let profiles = ProfileRepository::new(state.pool());

    let make_default = body.is_default;
    profiles
        .update_vehicle(user.id, vehicle_id, &body.into_new_vehicle())
        .await?;
    if make_default {
        profiles.set_default_vehicle(user.id, vehicle_id).await?;
    }

    profiles
        .get_vehicle(user.id, vehicle_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// DELETE /api/vehicles/{id}
///
/// Refuses to delete the last vehicle. When the default goes, the oldest
/// remaining vehicle is promoted.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let vehicle_id = VehicleId::new(id);
    let profiles = ProfileRepository::new(state.pool());

    let mut garage = profiles.list_vehicles(user.id).await?;
    let removed = delete_vehicle(&mut garage, vehicle_id)?;

    profiles.delete_vehicle(user.id, vehicle_id).await?;
    if removed.is_default
        && let Some(promoted) = garage.iter().find(|v| v.is_default)
    {
        profiles.set_default_vehicle(user.id, promoted.id).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/vehicles/{id}/default
pub async fn set_default(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let vehicle_id = VehicleId::new(id);
    let profiles = ProfileRepository::new(state.pool());

    // Validate against the loaded garage first so an unknown ID maps to the
    // domain error rather than a bare 404.
    let mut garage = profiles.list_vehicles(user.id).await?;
    set_default_vehicle(&mut garage, vehicle_id)?;

    profiles.set_default_vehicle(user.id, vehicle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
