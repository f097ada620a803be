//! Booking lifecycle error types.

use slotbook_shared::types::BookingId;
use thiserror::Error;

use crate::ledger::LedgerError;
use crate::points::PointsError;
use crate::pricing::PricingError;

use super::status::BookingStatus;

/// Errors that can occur while creating or transitioning a booking.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The requested transition is not in the state machine.
    #[error("Cannot transition booking from {from} to {to}")]
    InvalidTransition {
        /// The booking's current status.
        from: BookingStatus,
        /// The requested status.
        to: BookingStatus,
    },

    /// A rejection was attempted without a reason.
    #[error("A rejection requires a reason")]
    RejectionReasonRequired,

    /// A refunding transition could not find the original charge.
    #[error("Booking {booking_id} has no recorded charge to refund")]
    ChargeNotFound {
        /// The booking being refunded.
        booking_id: BookingId,
    },

    /// The charge or refund transaction failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Pricing the booking failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Awarding cashback points failed.
    #[error(transparent)]
    Points(#[from] PointsError),
}

impl BookingError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::ChargeNotFound { .. } => "CHARGE_NOT_FOUND",
            Self::Ledger(err) => err.error_code(),
            Self::Pricing(err) => err.error_code(),
            Self::Points(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 422,
            Self::RejectionReasonRequired => 400,
            Self::ChargeNotFound { .. } => 500,
            Self::Ledger(err) => err.status_code(),
            Self::Pricing(err) => match err {
                PricingError::NegativeBasePrice(_) => 400,
                PricingError::Questionnaire(inner) => inner.status_code(),
            },
            Self::Points(err) => err.status_code(),
        }
    }
}
