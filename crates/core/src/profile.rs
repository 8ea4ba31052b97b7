//! User profile, service history, and the booking merge policy.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::BookingDraft;
use crate::types::{Amount, ServiceRecordId, ServiceStatus, VehicleId};
use crate::vehicle::Vehicle;

/// A customer profile.
///
/// One per user identity, created empty at registration. Contact fields are
/// mutated by explicit profile edits and by [`merge_booking_into_profile`]
/// when a booking is submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Contact email shown on the profile page (the account email is the
    /// identity key and lives on the user, not here).
    pub email: String,
    /// Mobile number.
    pub phone: String,
    /// Pickup/delivery address.
    pub address: String,
    /// Registered vehicles. See [`crate::vehicle`] for the default invariant.
    pub vehicles: Vec<Vehicle>,
    /// Past and in-flight service bookings.
    pub service_history: Vec<ServiceRecord>,
    /// Notification and contact preferences.
    pub preferences: ServicePreferences,
}

impl UserProfile {
    /// The default vehicle, if any vehicle is registered.
    #[must_use]
    pub fn default_vehicle(&self) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.is_default)
    }
}

/// A completed or in-flight service booking on the customer's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Unique record ID.
    pub id: ServiceRecordId,
    /// Gateway-facing service reference (e.g. "#SVC04217").
    pub service_id: String,
    /// Service type as booked.
    pub service_type: String,
    /// Vehicle the service was booked for, when one was selected.
    pub vehicle_id: Option<VehicleId>,
    /// Scheduled service date.
    pub date: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: ServiceStatus,
    /// Amount paid.
    pub amount: Amount,
    /// Customer rating (1-5), once given.
    pub rating: Option<u8>,
    /// Free-form feedback attached to the rating.
    pub feedback: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Notification and contact preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePreferences {
    /// Send service reminders.
    pub reminders: bool,
    /// Preferred contact channel.
    pub contact_channel: ContactChannel,
}

impl Default for ServicePreferences {
    fn default() -> Self {
        Self {
            reminders: true,
            contact_channel: ContactChannel::Sms,
        }
    }
}

/// How the customer prefers to be contacted about a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Sms,
    Email,
    Phone,
}

/// Copy booking-supplied contact fields into the profile.
///
/// Precedence rule: the booking value wins when non-empty, otherwise the
/// profile's existing value is kept. Returns `true` when anything changed.
pub fn merge_booking_into_profile(profile: &mut UserProfile, draft: &BookingDraft) -> bool {
    let mut changed = false;
    changed |= overwrite_if_present(&mut profile.name, &draft.name);
    changed |= overwrite_if_present(&mut profile.phone, &draft.contact_number);
    changed |= overwrite_if_present(&mut profile.address, &draft.pickup_address);
    changed
}

fn overwrite_if_present(target: &mut String, source: &str) -> bool {
    if source.is_empty() || target == source {
        return false;
    }
    source.clone_into(target);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, contact: &str, address: &str) -> BookingDraft {
        BookingDraft {
            name: name.to_owned(),
            contact_number: contact.to_owned(),
            pickup_address: address.to_owned(),
            ..BookingDraft::default()
        }
    }

    #[test]
    fn test_merge_booking_overrides_non_empty() {
        let mut profile = UserProfile {
            name: "Old Name".to_owned(),
            phone: "1111111111".to_owned(),
            address: "Old Address".to_owned(),
            ..UserProfile::default()
        };

        let changed =
            merge_booking_into_profile(&mut profile, &draft("Amy", "9876543210", "12 New Lane"));

        assert!(changed);
        assert_eq!(profile.name, "Amy");
        assert_eq!(profile.phone, "9876543210");
        assert_eq!(profile.address, "12 New Lane");
    }

    #[test]
    fn test_merge_keeps_profile_when_booking_empty() {
        let mut profile = UserProfile {
            name: "Amy".to_owned(),
            phone: "9876543210".to_owned(),
            address: "12 New Lane".to_owned(),
            ..UserProfile::default()
        };

        let changed = merge_booking_into_profile(&mut profile, &draft("Amy", "", ""));

        assert!(!changed);
        assert_eq!(profile.phone, "9876543210");
        assert_eq!(profile.address, "12 New Lane");
    }

    #[test]
    fn test_merge_fills_empty_profile() {
        let mut profile = UserProfile::default();

        merge_booking_into_profile(&mut profile, &draft("Amy", "9876543210", ""));

        assert_eq!(profile.name, "Amy");
        assert_eq!(profile.phone, "9876543210");
        assert_eq!(profile.address, "");
    }

    #[test]
    fn test_default_vehicle_lookup() {
        use crate::vehicle::tests::vehicle;

        let profile = UserProfile {
            vehicles: vec![vehicle(1, false), vehicle(2, true)],
            ..UserProfile::default()
        };
        assert_eq!(
            profile.default_vehicle().map(|v| v.id),
            Some(crate::types::VehicleId::new(2))
        );
    }
}
