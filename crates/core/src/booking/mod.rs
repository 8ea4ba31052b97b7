//! Booking drafts and the session lifecycle state machine.

mod draft;
mod session;

pub use draft::BookingDraft;
pub use session::{BookingError, BookingSession, PaymentResolution};
