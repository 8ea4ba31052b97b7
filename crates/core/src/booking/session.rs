//! The booking session state machine.
//!
//! A session is always in exactly one of three states, and every event has a
//! single transition function. Invalid transitions are rejected by
//! construction rather than by checking boolean flags at the call sites.
//!
//! ```text
//!            submit_booking                complete_payment(Verified)
//! NoBooking ----------------> PendingPayment -----------------------> PaymentCompleted
//!     ^                          |      ^                                  |
//!     |     Rejected/TimedOut/   |      | submit (replace draft)           |
//!     |     Cancelled keep state +------+                                  |
//!     +--------------------------------------------------------------------+
//!                    start_new_booking / logout (logout from any state)
//! ```

use serde::{Deserialize, Serialize};

use crate::booking::BookingDraft;
use crate::payment::VerificationOutcome;
use crate::types::{Amount, resolve_amount};
use crate::vehicle::Vehicle;

/// Errors and navigation-guard signals from session transitions.
///
/// None of these are fatal; every variant is recoverable by re-prompting or
/// redirecting the customer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// Required booking fields are missing or unresolvable.
    #[error("missing required fields: {}", missing.join(", "))]
    Validation {
        /// Field names, in form order.
        missing: Vec<&'static str>,
    },

    /// Payment was requested but no booking is in flight ("book first").
    #[error("no active booking; submit a booking before paying")]
    NoActiveBooking,

    /// Payment was requested but the current booking is already paid
    /// ("start a new booking").
    #[error("booking already paid; start a new booking")]
    AlreadyPaid,

    /// The gateway's verification oracle rejected the confirmation, errored,
    /// or timed out. The draft is retained for retry.
    #[error("payment verification failed")]
    VerificationFailed,
}

/// How a payment attempt resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentResolution {
    /// Payment verified; the consumed draft is handed back so the caller can
    /// record it in the service history.
    Completed(BookingDraft),
    /// The customer dismissed the checkout. The draft stays in place.
    Cancelled,
}

/// The per-session booking lifecycle.
///
/// Scoped to one authenticated session; fully reset on logout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BookingSession {
    /// No booking in flight.
    #[default]
    NoBooking,
    /// A draft has been submitted and awaits payment.
    PendingPayment(BookingDraft),
    /// Payment verified; the draft was consumed. A fresh booking is required
    /// for the next service.
    PaymentCompleted,
}

impl BookingSession {
    /// Rebuild a session from persisted parts (a stored draft plus the
    /// payment-completed flag). A stored draft takes precedence over a stale
    /// completed flag.
    #[must_use]
    pub fn from_parts(draft: Option<BookingDraft>, payment_completed: bool) -> Self {
        match draft {
            Some(d) => Self::PendingPayment(d),
            None if payment_completed => Self::PaymentCompleted,
            None => Self::NoBooking,
        }
    }

    /// Decompose into persistable parts: the in-flight draft (if any) and
    /// the payment-completed flag.
    #[must_use]
    pub fn into_parts(self) -> (Option<BookingDraft>, bool) {
        match self {
            Self::NoBooking => (None, false),
            Self::PendingPayment(draft) => (Some(draft), false),
            Self::PaymentCompleted => (None, true),
        }
    }

    /// Whether a draft is awaiting payment.
    #[must_use]
    pub const fn has_active_booking(&self) -> bool {
        matches!(self, Self::PendingPayment(_))
    }

    /// Whether the last booking's payment completed (and no new booking has
    /// been started since).
    #[must_use]
    pub const fn payment_completed(&self) -> bool {
        matches!(self, Self::PaymentCompleted)
    }

    /// Submit a booking form.
    ///
    /// Valid from any state: a completed session implicitly starts over, and
    /// re-submitting while pending replaces the draft (the customer edited
    /// the form before paying). Either way exactly one draft is in flight
    /// afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Validation`] naming every missing required
    /// field; the state is left untouched.
    pub fn submit_booking(
        &mut self,
        draft: BookingDraft,
        vehicles: &[Vehicle],
    ) -> Result<(), BookingError> {
        let missing = draft.missing_fields(vehicles);
        if !missing.is_empty() {
            return Err(BookingError::Validation { missing });
        }

        *self = Self::PendingPayment(draft);
        Ok(())
    }

    /// Apply the outcome of a payment attempt.
    ///
    /// The cryptographic check happened elsewhere (the gateway's
    /// verification oracle); this transition only interprets the result.
    /// Only a `Verified` outcome reaches `PaymentCompleted` - rejection,
    /// gateway errors, and timeouts all leave the draft in place for retry,
    /// and a customer-dismissed checkout resolves as
    /// [`PaymentResolution::Cancelled`] without being an error.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NoActiveBooking`] or
    /// [`BookingError::AlreadyPaid`] when no payment is due, and
    /// [`BookingError::VerificationFailed`] when the oracle did not verify.
    pub fn complete_payment(
        &mut self,
        outcome: VerificationOutcome,
    ) -> Result<PaymentResolution, BookingError> {
        match self {
            Self::NoBooking => Err(BookingError::NoActiveBooking),
            Self::PaymentCompleted => Err(BookingError::AlreadyPaid),
            Self::PendingPayment(_) => match outcome {
                VerificationOutcome::Verified => {
                    let Self::PendingPayment(draft) = std::mem::replace(self, Self::PaymentCompleted)
                    else {
                        // Matched PendingPayment above.
                        return Err(BookingError::NoActiveBooking);
                    };
                    Ok(PaymentResolution::Completed(draft))
                }
                VerificationOutcome::Cancelled => Ok(PaymentResolution::Cancelled),
                VerificationOutcome::Rejected | VerificationOutcome::TimedOut => {
                    Err(BookingError::VerificationFailed)
                }
            },
        }
    }

    /// Clear a completed payment so a fresh booking can begin.
    ///
    /// No-op in other states: there is nothing to clear in `NoBooking`, and a
    /// pending draft must resolve through payment or logout.
    pub fn start_new_booking(&mut self) {
        if matches!(self, Self::PaymentCompleted) {
            *self = Self::NoBooking;
        }
    }

    /// Reset the session unconditionally.
    pub fn logout(&mut self) {
        *self = Self::NoBooking;
    }

    /// Inspect the payment step without mutating state.
    ///
    /// Yields the in-flight draft and its resolved amount.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::NoActiveBooking`] ("book first") or
    /// [`BookingError::AlreadyPaid`] ("start a new booking") as
    /// navigation-guard signals.
    pub fn payment_view(&self) -> Result<(&BookingDraft, Amount), BookingError> {
        match self {
            Self::NoBooking => Err(BookingError::NoActiveBooking),
            Self::PaymentCompleted => Err(BookingError::AlreadyPaid),
            Self::PendingPayment(draft) => Ok((draft, resolve_amount(&draft.service_type))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::VehicleId;
    use crate::vehicle::tests::vehicle;

    fn amy_draft() -> BookingDraft {
        BookingDraft {
            name: "Amy".to_owned(),
            contact_number: "9876543210".to_owned(),
            service_type: "Oil Change".to_owned(),
            vehicle_id: Some(VehicleId::new(1)),
            ..BookingDraft::default()
        }
    }

    fn pending_session() -> BookingSession {
        let mut session = BookingSession::NoBooking;
        session
            .submit_booking(amy_draft(), &[vehicle(1, true)])
            .unwrap();
        session
    }

    #[test]
    fn test_submit_valid_draft_enters_pending() {
        let session = pending_session();
        assert!(session.has_active_booking());
        assert!(!session.payment_completed());

        let (draft, amount) = session.payment_view().unwrap();
        assert_eq!(draft.name, "Amy");
        assert_eq!(amount.as_paise(), 2999);
    }

    #[test]
    fn test_submit_invalid_draft_leaves_state_unchanged() {
        let mut session = BookingSession::NoBooking;
        let err = session
            .submit_booking(BookingDraft::default(), &[vehicle(1, true)])
            .unwrap_err();

        assert!(matches!(err, BookingError::Validation { .. }));
        assert_eq!(session, BookingSession::NoBooking);
    }

    #[test]
    fn test_validation_error_names_missing_fields() {
        let mut session = BookingSession::NoBooking;
        let draft = BookingDraft {
            name: "Amy".to_owned(),
            ..BookingDraft::default()
        };
        let err = session.submit_booking(draft, &[]).unwrap_err();
        assert_eq!(
            err,
            BookingError::Validation {
                missing: vec!["contact_number", "service_type"],
            }
        );
    }

    #[test]
    fn test_verified_payment_consumes_draft() {
        let mut session = pending_session();
        let resolution = session
            .complete_payment(VerificationOutcome::Verified)
            .unwrap();

        let PaymentResolution::Completed(draft) = resolution else {
            panic!("expected completion");
        };
        assert_eq!(draft.service_type, "Oil Change");
        assert_eq!(session, BookingSession::PaymentCompleted);
        assert!(!session.has_active_booking());
    }

    #[test]
    fn test_rejected_payment_retains_draft() {
        let mut session = pending_session();
        let err = session
            .complete_payment(VerificationOutcome::Rejected)
            .unwrap_err();

        assert_eq!(err, BookingError::VerificationFailed);
        assert!(session.has_active_booking());
        // Draft unchanged: retry needs no re-entry.
        assert_eq!(session.payment_view().unwrap().0.name, "Amy");
    }

    #[test]
    fn test_timeout_treated_as_verification_failure() {
        let mut session = pending_session();
        let err = session
            .complete_payment(VerificationOutcome::TimedOut)
            .unwrap_err();
        assert_eq!(err, BookingError::VerificationFailed);
        assert!(session.has_active_booking());
    }

    #[test]
    fn test_cancelled_checkout_is_not_an_error() {
        let mut session = pending_session();
        let resolution = session
            .complete_payment(VerificationOutcome::Cancelled)
            .unwrap();
        assert_eq!(resolution, PaymentResolution::Cancelled);
        assert!(session.has_active_booking());
    }

    #[test]
    fn test_no_replay_after_completion() {
        let mut session = pending_session();
        session
            .complete_payment(VerificationOutcome::Verified)
            .unwrap();

        // A second confirmation against the consumed booking is rejected.
        let err = session
            .complete_payment(VerificationOutcome::Verified)
            .unwrap_err();
        assert_eq!(err, BookingError::AlreadyPaid);
    }

    #[test]
    fn test_payment_view_guards() {
        let session = BookingSession::NoBooking;
        assert_eq!(
            session.payment_view().unwrap_err(),
            BookingError::NoActiveBooking
        );

        let session = BookingSession::PaymentCompleted;
        assert_eq!(session.payment_view().unwrap_err(), BookingError::AlreadyPaid);
    }

    #[test]
    fn test_complete_payment_without_booking() {
        let mut session = BookingSession::NoBooking;
        let err = session
            .complete_payment(VerificationOutcome::Verified)
            .unwrap_err();
        assert_eq!(err, BookingError::NoActiveBooking);
    }

    #[test]
    fn test_start_new_booking_clears_completed_only() {
        let mut session = BookingSession::PaymentCompleted;
        session.start_new_booking();
        assert_eq!(session, BookingSession::NoBooking);

        let mut session = pending_session();
        session.start_new_booking();
        assert!(session.has_active_booking());
    }

    #[test]
    fn test_logout_resets_from_any_state() {
        for mut session in [
            BookingSession::NoBooking,
            pending_session(),
            BookingSession::PaymentCompleted,
        ] {
            session.logout();
            assert_eq!(session, BookingSession::NoBooking);
        }
    }

    #[test]
    fn test_resubmit_replaces_pending_draft() {
        let mut session = pending_session();
        let replacement = BookingDraft {
            service_type: "Full Service".to_owned(),
            ..amy_draft()
        };
        session
            .submit_booking(replacement, &[vehicle(1, true)])
            .unwrap();
        assert_eq!(session.payment_view().unwrap().1.as_paise(), 7999);
    }

    #[test]
    fn test_parts_roundtrip() {
        let session = pending_session();
        let (draft, completed) = session.clone().into_parts();
        assert_eq!(BookingSession::from_parts(draft, completed), session);

        let (draft, completed) = BookingSession::PaymentCompleted.into_parts();
        assert!(draft.is_none());
        assert!(completed);
        assert_eq!(
            BookingSession::from_parts(None, true),
            BookingSession::PaymentCompleted
        );
    }
}
