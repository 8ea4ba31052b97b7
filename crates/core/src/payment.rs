//! Payment session types and verification outcomes.

use serde::{Deserialize, Serialize};

use crate::types::{Amount, PaymentStatus};

/// One payment attempt for an in-flight booking.
///
/// At most one session is active per booking draft. The session is created
/// when the draft enters the payment step and reaches a terminal
/// [`PaymentStatus`] exactly once; a completed session is never replayed
/// because the draft it paid for is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    /// Customer-facing service reference (e.g. "#SVC04217").
    pub service_id: String,
    /// Amount due, derived from the service type via the fixed price table.
    pub amount: Amount,
    /// Payment method label (e.g. "razorpay").
    pub method: String,
    /// Session status.
    pub status: PaymentStatus,
    /// Gateway order reference from order creation.
    pub order_ref: Option<String>,
    /// Gateway payment reference from the verified confirmation.
    pub confirmation_ref: Option<String>,
}

impl PaymentSession {
    /// Start a pending session for an amount.
    #[must_use]
    pub const fn pending(service_id: String, amount: Amount, method: String) -> Self {
        Self {
            service_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            order_ref: None,
            confirmation_ref: None,
        }
    }

    /// Attach the gateway order reference created for this attempt.
    #[must_use]
    pub fn with_order(mut self, order_ref: String) -> Self {
        self.order_ref = Some(order_ref);
        self
    }

    /// Whether a confirmation's order reference belongs to this attempt.
    #[must_use]
    pub fn matches_order(&self, order_ref: &str) -> bool {
        self.order_ref.as_deref() == Some(order_ref)
    }

    /// Mark the attempt verified, recording the gateway's payment reference.
    pub fn complete(&mut self, confirmation_ref: String) {
        self.status = PaymentStatus::Completed;
        self.confirmation_ref = Some(confirmation_ref);
    }

    /// Mark the attempt failed. The confirmation reference stays empty;
    /// trust comes only from a verified signature.
    pub fn fail(&mut self) {
        self.status = PaymentStatus::Failed;
    }

    /// Mark the attempt abandoned by the customer.
    pub fn cancel(&mut self) {
        self.status = PaymentStatus::Cancelled;
    }
}

/// Result of the gateway's verification oracle, as interpreted by the
/// booking session.
///
/// The oracle's boolean answer is ground truth; the controller never
/// re-derives trust from any other field. Timeouts and transport failures
/// map to [`VerificationOutcome::TimedOut`] / [`VerificationOutcome::Rejected`]
/// so they can never silently complete a payment. A checkout dismissed by
/// the customer before the gateway answered is `Cancelled`, modelled
/// explicitly rather than inferred from a closed dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The gateway confirmed the signature matches.
    Verified,
    /// The gateway answered and did not verify, or errored.
    Rejected,
    /// The verification call did not answer within the deadline.
    TimedOut,
    /// The customer abandoned the checkout.
    Cancelled,
}

impl VerificationOutcome {
    /// Collapse a raw oracle answer into an outcome.
    #[must_use]
    pub const fn from_oracle(verified: bool) -> Self {
        if verified { Self::Verified } else { Self::Rejected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_mapping() {
        assert_eq!(
            VerificationOutcome::from_oracle(true),
            VerificationOutcome::Verified
        );
        assert_eq!(
            VerificationOutcome::from_oracle(false),
            VerificationOutcome::Rejected
        );
    }

    #[test]
    fn test_pending_session_shape() {
        let session = PaymentSession::pending(
            "#SVC04217".to_owned(),
            Amount::from_paise(2999),
            "razorpay".to_owned(),
        );
        assert_eq!(session.status, PaymentStatus::Pending);
        assert!(session.order_ref.is_none());
        assert!(session.confirmation_ref.is_none());
    }

    fn attempt() -> PaymentSession {
        PaymentSession::pending(
            "#SVC04217".to_owned(),
            Amount::from_paise(2999),
            "razorpay".to_owned(),
        )
        .with_order("order_abc".to_owned())
    }

    #[test]
    fn test_order_matching() {
        let session = attempt();
        assert!(session.matches_order("order_abc"));
        assert!(!session.matches_order("order_xyz"));
        assert!(!PaymentSession::pending(
            "#SVC00001".to_owned(),
            Amount::from_paise(1999),
            "razorpay".to_owned(),
        )
        .matches_order("order_abc"));
    }

    #[test]
    fn test_completed_attempt_records_confirmation() {
        let mut session = attempt();
        session.complete("pay_123".to_owned());
        assert_eq!(session.status, PaymentStatus::Completed);
        assert!(session.status.is_terminal());
        assert_eq!(session.confirmation_ref.as_deref(), Some("pay_123"));
    }

    #[test]
    fn test_failed_and_cancelled_attempts_are_terminal_without_confirmation() {
        let mut failed = attempt();
        failed.fail();
        assert_eq!(failed.status, PaymentStatus::Failed);
        assert!(failed.status.is_terminal());
        assert!(failed.confirmation_ref.is_none());

        let mut cancelled = attempt();
        cancelled.cancel();
        assert_eq!(cancelled.status, PaymentStatus::Cancelled);
        assert!(cancelled.status.is_terminal());
        assert!(cancelled.confirmation_ref.is_none());
    }
}
