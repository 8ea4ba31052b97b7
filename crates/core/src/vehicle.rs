//! Vehicle records and garage invariant helpers.
//!
//! Invariant: within one profile, a non-empty vehicle list always has exactly
//! one vehicle with `is_default = true`. Every mutation helper in this module
//! preserves that invariant; callers never toggle the flag directly.

use serde::{Deserialize, Serialize};

use crate::types::VehicleId;

/// A customer vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique vehicle ID.
    pub id: VehicleId,
    /// Manufacturer (e.g. "Toyota").
    pub make: String,
    /// Model name (e.g. "Camry").
    pub model: String,
    /// Model year.
    pub year: i32,
    /// License plate, uppercased (e.g. "MH12AB1234").
    pub license_plate: String,
    /// Body color.
    pub color: String,
    /// Current odometer reading in kilometres.
    pub mileage: i32,
    /// Whether this is the default vehicle for new bookings.
    pub is_default: bool,
}

/// Errors from garage mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GarageError {
    /// Refused to delete the only remaining vehicle.
    #[error("cannot delete the last vehicle")]
    LastVehicle,
    /// The vehicle ID does not exist in this garage.
    #[error("vehicle {0} not found")]
    UnknownVehicle(VehicleId),
}

/// Add a vehicle to the garage.
///
/// The first vehicle always becomes the default. If the new vehicle is
/// flagged default, the flag is cleared on all others.
pub fn add_vehicle(vehicles: &mut Vec<Vehicle>, mut vehicle: Vehicle) {
    if vehicles.is_empty() {
        vehicle.is_default = true;
    } else if vehicle.is_default {
        for existing in vehicles.iter_mut() {
            existing.is_default = false;
        }
    }
    vehicles.push(vehicle);
}

/// Replace an existing vehicle's details.
///
/// # Errors
///
/// Returns `GarageError::UnknownVehicle` if no vehicle matches
/// `vehicle.id`.
pub fn update_vehicle(vehicles: &mut [Vehicle], vehicle: Vehicle) -> Result<(), GarageError> {
    let pos = vehicles
        .iter()
        .position(|v| v.id == vehicle.id)
        .ok_or(GarageError::UnknownVehicle(vehicle.id))?;

    // An update may not strip the garage of its default: if the edited
    // vehicle was the default and the update clears the flag, keep it set.
    let was_default = vehicles.get(pos).is_some_and(|v| v.is_default);

    if vehicle.is_default {
        for existing in vehicles.iter_mut() {
            existing.is_default = false;
        }
    }

    if let Some(slot) = vehicles.get_mut(pos) {
        *slot = vehicle;
        if was_default {
            slot.is_default = true;
        }
    }
    Ok(())
}

/// Make exactly the vehicle matching `id` the default.
///
/// # Errors
///
/// Returns `GarageError::UnknownVehicle` if no vehicle matches `id`.
pub fn set_default_vehicle(vehicles: &mut [Vehicle], id: VehicleId) -> Result<(), GarageError> {
    if !vehicles.iter().any(|v| v.id == id) {
        return Err(GarageError::UnknownVehicle(id));
    }

    for vehicle in vehicles.iter_mut() {
        vehicle.is_default = vehicle.id == id;
    }
    Ok(())
}

/// Remove the vehicle matching `id`, returning it.
///
/// If the deleted vehicle was the default, the first remaining vehicle is
/// promoted.
///
/// # Errors
///
/// Returns `GarageError::LastVehicle` when only one vehicle remains, and
/// `GarageError::UnknownVehicle` if no vehicle matches `id`.
pub fn delete_vehicle(vehicles: &mut Vec<Vehicle>, id: VehicleId) -> Result<Vehicle, GarageError> {
    if vehicles.len() == 1 {
        return Err(GarageError::LastVehicle);
    }

    let pos = vehicles
        .iter()
        .position(|v| v.id == id)
        .ok_or(GarageError::UnknownVehicle(id))?;

    let removed = vehicles.remove(pos);
    if removed.is_default
        && let Some(first) = vehicles.first_mut()
    {
        first.is_default = true;
    }
    Ok(removed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn vehicle(id: i32, is_default: bool) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id),
            make: "Toyota".to_owned(),
            model: "Camry".to_owned(),
            year: 2020,
            license_plate: "MH12AB1234".to_owned(),
            color: "Blue".to_owned(),
            mileage: 45_000,
            is_default,
        }
    }

    fn default_count(vehicles: &[Vehicle]) -> usize {
        vehicles.iter().filter(|v| v.is_default).count()
    }

    #[test]
    fn test_first_vehicle_becomes_default() {
        let mut garage = Vec::new();
        add_vehicle(&mut garage, vehicle(1, false));
        assert!(garage[0].is_default);
    }

    #[test]
    fn test_add_default_clears_others() {
        let mut garage = vec![vehicle(1, true)];
        add_vehicle(&mut garage, vehicle(2, true));
        assert!(!garage[0].is_default);
        assert!(garage[1].is_default);
        assert_eq!(default_count(&garage), 1);
    }

    #[test]
    fn test_set_default_is_exclusive() {
        let mut garage = vec![vehicle(1, true), vehicle(2, false), vehicle(3, false)];
        set_default_vehicle(&mut garage, VehicleId::new(3)).unwrap();
        assert!(!garage[0].is_default);
        assert!(garage[2].is_default);
        assert_eq!(default_count(&garage), 1);
    }

    #[test]
    fn test_set_default_unknown_vehicle() {
        let mut garage = vec![vehicle(1, true)];
        let err = set_default_vehicle(&mut garage, VehicleId::new(9)).unwrap_err();
        assert_eq!(err, GarageError::UnknownVehicle(VehicleId::new(9)));
        assert!(garage[0].is_default);
    }

    #[test]
    fn test_delete_last_vehicle_refused() {
        let mut garage = vec![vehicle(1, true)];
        let err = delete_vehicle(&mut garage, VehicleId::new(1)).unwrap_err();
        assert_eq!(err, GarageError::LastVehicle);
        assert_eq!(garage.len(), 1);
    }

    #[test]
    fn test_delete_default_promotes_first_remaining() {
        let mut garage = vec![vehicle(1, true), vehicle(2, false)];
        delete_vehicle(&mut garage, VehicleId::new(1)).unwrap();
        assert_eq!(garage.len(), 1);
        assert_eq!(garage[0].id, VehicleId::new(2));
        assert!(garage[0].is_default);
    }

    #[test]
    fn test_delete_non_default_keeps_default() {
        let mut garage = vec![vehicle(1, true), vehicle(2, false), vehicle(3, false)];
        delete_vehicle(&mut garage, VehicleId::new(3)).unwrap();
        assert!(garage[0].is_default);
        assert_eq!(default_count(&garage), 1);
    }

    #[test]
    fn test_update_cannot_strip_default() {
        let mut garage = vec![vehicle(1, true), vehicle(2, false)];
        let mut edited = vehicle(1, false);
        edited.color = "Red".to_owned();
        update_vehicle(&mut garage, edited).unwrap();
        assert!(garage[0].is_default);
        assert_eq!(garage[0].color, "Red");
    }

    #[test]
    fn test_invariant_across_mixed_operations() {
        let mut garage = Vec::new();
        add_vehicle(&mut garage, vehicle(1, false));
        add_vehicle(&mut garage, vehicle(2, true));
        add_vehicle(&mut garage, vehicle(3, false));
        set_default_vehicle(&mut garage, VehicleId::new(1)).unwrap();
        delete_vehicle(&mut garage, VehicleId::new(1)).unwrap();
        update_vehicle(&mut garage, vehicle(3, true)).unwrap();
        assert_eq!(default_count(&garage), 1);
    }
}
