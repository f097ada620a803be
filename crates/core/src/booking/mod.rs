//! Booking lifecycle.
//!
//! This module implements the booking state machine:
//! - Status definitions and legal transitions
//! - Booking creation (pricing + charge in one idempotent transaction)
//! - Transitions that move money (approval refunds, cancellations) driving
//!   exactly one ledger transaction before the status write
//! - Refund entry construction by reversing the original charge

pub mod error;
pub mod reversal;
pub mod service;
pub mod status;
pub mod types;

pub use error::BookingError;
pub use reversal::{build_partial_refund_draft, build_refund_draft, refund_key};
pub use service::{
    charge_key, BookingService, CashbackPolicy, NewBookingRequest, PercentCashback, RefundPolicy,
    TransitionContext, WindowRefundPolicy,
};
pub use status::BookingStatus;
pub use types::{Booking, CancelledBy, TransitionOutcome};
