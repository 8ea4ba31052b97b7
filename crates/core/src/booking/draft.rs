//! Booking form data and its validation rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::VehicleId;
use crate::vehicle::Vehicle;

/// A submitted booking form, pending payment.
///
/// Exactly one draft exists per session while a booking is in flight. The
/// draft is consumed when payment completes and retained across failed or
/// cancelled payment attempts so the customer can retry without re-entering
/// the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    /// Customer name.
    pub name: String,
    /// Contact phone number.
    pub contact_number: String,
    /// Address for vehicle pickup.
    pub pickup_address: String,
    /// Selected vehicle, required when the profile has vehicles.
    pub vehicle_id: Option<VehicleId>,
    /// Requested service type (free-form; priced via the fixed table).
    pub service_type: String,
    /// Preferred service date.
    pub preferred_date: Option<NaiveDate>,
    /// Preferred time slot (e.g. "09:00").
    pub preferred_time: Option<String>,
    /// URIs of uploaded condition photos. Upload storage is external; only
    /// the references travel with the draft.
    pub photos: Vec<String>,
    /// Anything the technician should know.
    pub special_instructions: String,
}

impl BookingDraft {
    /// Check required fields against the customer's vehicle list.
    ///
    /// Returns the names of all missing or unresolvable required fields at
    /// once, so a form can flag every problem in a single round trip. An
    /// empty result means the draft is submittable.
    #[must_use]
    pub fn missing_fields(&self, vehicles: &[Vehicle]) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.contact_number.trim().is_empty() {
            missing.push("contact_number");
        }
        if self.service_type.trim().is_empty() {
            missing.push("service_type");
        }
        // A vehicle must be picked once the profile has any, and it must
        // actually exist.
        if !vehicles.is_empty() {
            let resolvable = self
                .vehicle_id
                .is_some_and(|id| vehicles.iter().any(|v| v.id == id));
            if !resolvable {
                missing.push("vehicle_id");
            }
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::tests::vehicle;

    fn valid_draft() -> BookingDraft {
        BookingDraft {
            name: "Amy".to_owned(),
            contact_number: "9876543210".to_owned(),
            service_type: "Oil Change".to_owned(),
            vehicle_id: Some(VehicleId::new(1)),
            ..BookingDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_has_no_missing_fields() {
        let garage = vec![vehicle(1, true)];
        assert!(valid_draft().missing_fields(&garage).is_empty());
    }

    #[test]
    fn test_all_missing_fields_reported_at_once() {
        let draft = BookingDraft::default();
        let garage = vec![vehicle(1, true)];
        assert_eq!(
            draft.missing_fields(&garage),
            vec!["name", "contact_number", "service_type", "vehicle_id"]
        );
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let draft = BookingDraft {
            name: "  ".to_owned(),
            ..valid_draft()
        };
        assert_eq!(draft.missing_fields(&[]), vec!["name"]);
    }

    #[test]
    fn test_vehicle_not_required_for_empty_garage() {
        let draft = BookingDraft {
            vehicle_id: None,
            ..valid_draft()
        };
        assert!(draft.missing_fields(&[]).is_empty());
    }

    #[test]
    fn test_unresolvable_vehicle_is_missing() {
        let draft = BookingDraft {
            vehicle_id: Some(VehicleId::new(9)),
            ..valid_draft()
        };
        let garage = vec![vehicle(1, true)];
        assert_eq!(draft.missing_fields(&garage), vec!["vehicle_id"]);
    }
}
