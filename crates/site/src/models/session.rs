//! Session-related types.
//!
//! Types stored in the session for authentication and booking state.

use serde::{Deserialize, Serialize};

use quickcar_core::{Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the payment-completed flag. Set when a booking's payment is
    /// verified and cleared when a new booking is started.
    pub const PAYMENT_COMPLETED: &str = "payment_completed";

    /// Key for the in-flight payment attempt (a serialized
    /// `quickcar_core::PaymentSession`) awaiting gateway confirmation.
    pub const PENDING_PAYMENT: &str = "pending_payment";
}
