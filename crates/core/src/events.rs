//! Domain notification events.
//!
//! Emitted after a transition commits so listeners (toasts, realtime feeds)
//! can react. Notifications only - the state machine's correctness never
//! depends on anyone observing them.

use serde::{Deserialize, Serialize};

use crate::types::{Amount, UserId};

/// A notification about a booking lifecycle change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A booking draft was accepted and awaits payment.
    BookingSubmitted {
        user_id: UserId,
        service_type: String,
        amount: Amount,
    },
    /// A payment was verified and the booking recorded.
    PaymentCompleted {
        user_id: UserId,
        service_id: String,
        amount: Amount,
    },
    /// A payment attempt did not verify; the draft is retained.
    PaymentFailed { user_id: UserId, service_id: String },
    /// The customer abandoned the checkout; the draft is retained.
    PaymentCancelled { user_id: UserId },
}
