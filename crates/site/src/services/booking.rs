//! Booking orchestration.
//!
//! Glue between the pure booking state machine, the database, the gateway
//! client, and the session. The lifecycle lives in
//! [`quickcar_core::BookingSession`]; this service rebuilds it from persisted
//! parts, applies one transition, and persists the parts back.

use quickcar_core::{
    Amount, BookingDraft, BookingSession, DomainEvent, PaymentResolution, PaymentSession,
    ServiceRecord, ServiceRecordId, ServiceStatus, UserProfile, VerificationOutcome,
    merge_booking_into_profile, resolve_amount,
};
use rand::Rng;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::db::profiles::ProfileDetails;
use crate::db::{BookingRepository, ProfileRepository};
use crate::error::AppError;
use crate::models::session::{CurrentUser, keys};
use crate::razorpay::{Order, PaymentConfirmation};
use crate::state::AppState;

/// What the checkout page needs to open the gateway widget.
#[derive(Debug, serde::Serialize)]
pub struct CheckoutContext {
    /// Gateway order, created fresh for this attempt.
    pub order_id: String,
    /// Amount in paise.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Public gateway key for the widget.
    pub key_id: String,
    /// Service being paid for.
    pub service_type: String,
}

/// Booking orchestration service.
pub struct BookingService<'a> {
    state: &'a AppState,
}

impl<'a> BookingService<'a> {
    /// Create a new booking service.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Rebuild the booking session from the stored draft and the session's
    /// payment-completed flag.
    async fn load_session(
        &self,
        user: &CurrentUser,
        session: &Session,
    ) -> Result<BookingSession, AppError> {
        let draft = BookingRepository::new(self.state.pool())
            .get_draft(user.id)
            .await?;
        let completed: bool = session
            .get(keys::PAYMENT_COMPLETED)
            .await?
            .unwrap_or_default();

        Ok(BookingSession::from_parts(draft, completed))
    }

    /// Persist the session back into its parts.
    async fn persist_session(
        &self,
        user: &CurrentUser,
        session: &Session,
        booking: BookingSession,
    ) -> Result<(), AppError> {
        let repo = BookingRepository::new(self.state.pool());
        let (draft, completed) = booking.into_parts();

        match draft {
            Some(d) => repo.upsert_draft(user.id, &d).await?,
            None => repo.delete_draft(user.id).await?,
        }
        session.insert(keys::PAYMENT_COMPLETED, completed).await?;

        Ok(())
    }

    /// Current lifecycle snapshot for the client.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Repository` if loading fails.
    pub async fn current(
        &self,
        user: &CurrentUser,
        session: &Session,
    ) -> Result<BookingSession, AppError> {
        self.load_session(user, session).await
    }

    /// Submit a booking form.
    ///
    /// Validates against the user's garage, enters `PendingPayment`, and
    /// copies non-empty contact fields onto the profile.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Booking` with every missing field on validation
    /// failure.
    pub async fn submit_booking(
        &self,
        user: &CurrentUser,
        session: &Session,
        draft: BookingDraft,
    ) -> Result<Amount, AppError> {
        let profiles = ProfileRepository::new(self.state.pool());
        let vehicles = profiles.list_vehicles(user.id).await?;

        let mut booking = self.load_session(user, session).await?;
        booking.submit_booking(draft.clone(), &vehicles)?;
        let amount = resolve_amount(&draft.service_type);

        self.persist_session(user, session, booking).await?;
        self.merge_into_profile(user, &draft).await?;

        info!(user_id = %user.id, service_type = %draft.service_type, "booking submitted");
        self.state.publish(DomainEvent::BookingSubmitted {
            user_id: user.id,
            service_type: draft.service_type,
            amount,
        });

        Ok(amount)
    }

    /// Copy booking-supplied contact fields onto the profile row.
    async fn merge_into_profile(
        &self,
        user: &CurrentUser,
        draft: &BookingDraft,
    ) -> Result<(), AppError> {
        let profiles = ProfileRepository::new(self.state.pool());
        let details = profiles.get(user.id).await?.unwrap_or_default();

        let mut profile = UserProfile {
            name: details.name.clone(),
            phone: details.phone.clone(),
            address: details.address.clone(),
            ..UserProfile::default()
        };

        if merge_booking_into_profile(&mut profile, draft) {
            profiles
                .upsert(
                    user.id,
                    &ProfileDetails {
                        name: profile.name,
                        phone: profile.phone,
                        address: profile.address,
                        preferences: details.preferences,
                    },
                )
                .await?;
        }

        Ok(())
    }

    /// Create a gateway order for the in-flight booking.
    ///
    /// Guarded by the state machine: "book first" when nothing is pending,
    /// "start a new booking" after completion. A fresh payment attempt is
    /// pinned in the session so the confirmation can be matched against its
    /// order reference; re-checkout after a failed or dismissed attempt
    /// replaces the pinned attempt.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Gateway` when the gateway call fails or exceeds
    /// the configured deadline.
    pub async fn create_checkout(
        &self,
        user: &CurrentUser,
        session: &Session,
    ) -> Result<CheckoutContext, AppError> {
        let booking = self.load_session(user, session).await?;
        let (draft, amount) = booking.payment_view()?;

        let notes = serde_json::json!({
            "service_type": draft.service_type,
            "customer": draft.name,
            "vehicle_id": draft.vehicle_id,
        });

        let order = self.create_order_with_deadline(amount, notes).await?;
        let payment =
            PaymentSession::pending(generate_service_id(), amount, "razorpay".to_owned())
                .with_order(order.id.clone());
        session.insert(keys::PENDING_PAYMENT, &payment).await?;

        Ok(CheckoutContext {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: self.state.razorpay().key_id().to_owned(),
            service_type: draft.service_type.clone(),
        })
    }

    async fn create_order_with_deadline(
        &self,
        amount: Amount,
        notes: serde_json::Value,
    ) -> Result<Order, AppError> {
        let deadline = self.state.config().payment_verify_timeout;
        let result = tokio::time::timeout(
            deadline,
            self.state.razorpay().create_order(amount, notes),
        )
        .await;

        match result {
            Ok(Ok(order)) => Ok(order),
            Ok(Err(e)) => {
                warn!(error = %e, "gateway order creation failed");
                Err(AppError::Gateway(e.to_string()))
            }
            Err(_) => {
                warn!(deadline_secs = deadline.as_secs(), "gateway order creation timed out");
                Err(AppError::Gateway("gateway deadline exceeded".to_owned()))
            }
        }
    }

    /// Apply a checkout confirmation.
    ///
    /// The signature is recomputed locally; only an exact match over the
    /// pinned attempt's order completes the booking. A mismatched or stale
    /// order reference is a rejection, never a silent success. A rejected
    /// signature over the pinned order closes that attempt as failed; the
    /// draft is retained and a new checkout starts a fresh attempt.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Booking(VerificationFailed)` when the oracle did
    /// not verify.
    pub async fn confirm_payment(
        &self,
        user: &CurrentUser,
        session: &Session,
        confirmation: &PaymentConfirmation,
    ) -> Result<ServiceRecord, AppError> {
        let mut booking = self.load_session(user, session).await?;

        let payment: Option<PaymentSession> = session.get(keys::PENDING_PAYMENT).await?;
        let order_matches = payment
            .as_ref()
            .is_some_and(|p| p.matches_order(&confirmation.razorpay_order_id));

        let verified = order_matches
            && self
                .state
                .razorpay()
                .verify_signature(confirmation)
                .map_err(|e| AppError::Internal(e.to_string()))?;

        let outcome = VerificationOutcome::from_oracle(verified);
        let resolution = booking.complete_payment(outcome);

        match resolution {
            Ok(PaymentResolution::Completed(draft)) => {
                let mut payment = payment
                    .ok_or_else(|| AppError::Internal("no pending payment attempt".to_owned()))?;
                payment.complete(confirmation.razorpay_payment_id.clone());

                self.persist_session(user, session, booking).await?;
                session
                    .remove::<PaymentSession>(keys::PENDING_PAYMENT)
                    .await?;

                let record = self.record_completed_service(user, &draft, &payment).await?;

                info!(
                    user_id = %user.id,
                    service_id = %payment.service_id,
                    status = ?payment.status,
                    amount = %payment.amount,
                    "payment verified"
                );
                self.state.publish(DomainEvent::PaymentCompleted {
                    user_id: user.id,
                    service_id: record.service_id.clone(),
                    amount: record.amount,
                });

                Ok(record)
            }
            Ok(PaymentResolution::Cancelled) => {
                // Unreachable from a confirmation; cancellation comes in via
                // cancel_checkout.
                Err(AppError::Booking(
                    quickcar_core::BookingError::VerificationFailed,
                ))
            }
            Err(e) => {
                if matches!(e, quickcar_core::BookingError::VerificationFailed) {
                    if order_matches && let Some(mut payment) = payment {
                        payment.fail();
                        session
                            .remove::<PaymentSession>(keys::PENDING_PAYMENT)
                            .await?;
                        warn!(
                            user_id = %user.id,
                            service_id = %payment.service_id,
                            status = ?payment.status,
                            "payment verification failed"
                        );
                        self.state.publish(DomainEvent::PaymentFailed {
                            user_id: user.id,
                            service_id: payment.service_id.clone(),
                        });
                    } else {
                        warn!(
                            user_id = %user.id,
                            order_id = %confirmation.razorpay_order_id,
                            "confirmation for an unknown order rejected"
                        );
                        self.state.publish(DomainEvent::PaymentFailed {
                            user_id: user.id,
                            service_id: confirmation.razorpay_order_id.clone(),
                        });
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Handle a dismissed checkout. The draft stays in place for retry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Booking` when no payment was due.
    pub async fn cancel_checkout(
        &self,
        user: &CurrentUser,
        session: &Session,
    ) -> Result<(), AppError> {
        let mut booking = self.load_session(user, session).await?;
        match booking.complete_payment(VerificationOutcome::Cancelled)? {
            PaymentResolution::Cancelled => {
                let payment: Option<PaymentSession> =
                    session.remove(keys::PENDING_PAYMENT).await?;
                if let Some(mut payment) = payment {
                    payment.cancel();
                    info!(
                        user_id = %user.id,
                        service_id = %payment.service_id,
                        status = ?payment.status,
                        "checkout dismissed"
                    );
                }
                self.state
                    .publish(DomainEvent::PaymentCancelled { user_id: user.id });
                Ok(())
            }
            PaymentResolution::Completed(_) => {
                // Cancelled outcome never completes.
                Err(AppError::Internal("unexpected completion on cancel".to_owned()))
            }
        }
    }

    /// Clear a completed payment so a fresh booking can begin.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Repository` if persistence fails.
    pub async fn start_new_booking(
        &self,
        user: &CurrentUser,
        session: &Session,
    ) -> Result<(), AppError> {
        let mut booking = self.load_session(user, session).await?;
        booking.start_new_booking();
        self.persist_session(user, session, booking).await
    }

    /// Append the paid booking to the service history, carrying the service
    /// reference and amount over from the completed payment attempt.
    async fn record_completed_service(
        &self,
        user: &CurrentUser,
        draft: &BookingDraft,
        payment: &PaymentSession,
    ) -> Result<ServiceRecord, AppError> {
        let repo = BookingRepository::new(self.state.pool());

        let record = repo
            .insert_record(
                user.id,
                &payment.service_id,
                &draft.service_type,
                draft.vehicle_id,
                draft.preferred_date,
                payment.amount,
            )
            .await?;

        Ok(record)
    }

    /// Cancel a confirmed service from the history.
    ///
    /// Only records that have not progressed past technician assignment can
    /// be cancelled.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown record and
    /// `AppError::BadRequest` when the record is past cancellation.
    pub async fn cancel_service(
        &self,
        user: &CurrentUser,
        record_id: ServiceRecordId,
    ) -> Result<(), AppError> {
        let repo = BookingRepository::new(self.state.pool());
        let record = repo
            .get_record(user.id, record_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !record.status.is_cancellable() {
            return Err(AppError::BadRequest(format!(
                "a {} service cannot be cancelled",
                record.status
            )));
        }

        repo.update_status(user.id, record_id, ServiceStatus::Cancelled)
            .await?;

        info!(user_id = %user.id, service_id = %record.service_id, "service cancelled");
        Ok(())
    }
}

/// Gateway-facing service reference, e.g. `#SVC04217`.
fn generate_service_id() -> String {
    let n: u32 = rand::rng().random_range(0..100_000);
    format!("#SVC{n:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_id_shape() {
        let id = generate_service_id();
        assert!(id.starts_with("#SVC"));
        assert_eq!(id.len(), 9);
        assert!(id[4..].chars().all(|c| c.is_ascii_digit()));
    }
}
