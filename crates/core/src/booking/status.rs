//! Booking status definitions and legal transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status in the lifecycle state machine.
///
/// The valid transitions are:
/// - AwaitingApproval → Pending (business approves)
/// - AwaitingApproval → RejectedByBusiness (business rejects, full refund)
/// - Pending → Completed (class concluded)
/// - Pending → NoShow
/// - Pending → CancelledByConsumer / CancelledByBusiness (refund policy)
/// - Pending → CancelledByBusinessRebookable (refund + replacement offer)
///
/// A rebookable cancellation may lead to a *new* booking in `Pending`;
/// the cancelled booking itself never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Waiting for the business to approve or reject.
    AwaitingApproval,
    /// Confirmed and upcoming.
    Pending,
    /// Class concluded (terminal).
    Completed,
    /// Consumer did not attend (terminal).
    NoShow,
    /// Cancelled by the consumer (terminal).
    CancelledByConsumer,
    /// Cancelled by the business (terminal).
    CancelledByBusiness,
    /// Cancelled by the business with a replacement slot offered (terminal).
    CancelledByBusinessRebookable,
    /// Rejected by the business with a reason (terminal).
    RejectedByBusiness,
}

impl BookingStatus {
    /// The initial status of a new booking.
    #[must_use]
    pub const fn initial(requires_approval: bool) -> Self {
        if requires_approval {
            Self::AwaitingApproval
        } else {
            Self::Pending
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingApproval => "awaiting_approval",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::NoShow => "no_show",
            Self::CancelledByConsumer => "cancelled_by_consumer",
            Self::CancelledByBusiness => "cancelled_by_business",
            Self::CancelledByBusinessRebookable => "cancelled_by_business_rebookable",
            Self::RejectedByBusiness => "rejected_by_business",
        }
    }

    /// Parses a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "awaiting_approval" => Some(Self::AwaitingApproval),
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "no_show" => Some(Self::NoShow),
            "cancelled_by_consumer" => Some(Self::CancelledByConsumer),
            "cancelled_by_business" => Some(Self::CancelledByBusiness),
            "cancelled_by_business_rebookable" => Some(Self::CancelledByBusinessRebookable),
            "rejected_by_business" => Some(Self::RejectedByBusiness),
            _ => None,
        }
    }

    /// Returns true once no further transition is legal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::NoShow
                | Self::CancelledByConsumer
                | Self::CancelledByBusiness
                | Self::CancelledByBusinessRebookable
                | Self::RejectedByBusiness
        )
    }

    /// Check if a status transition is legal.
    #[must_use]
    pub const fn is_valid_transition(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (
                Self::AwaitingApproval,
                Self::Pending | Self::RejectedByBusiness
            ) | (
                Self::Pending,
                Self::Completed
                    | Self::NoShow
                    | Self::CancelledByConsumer
                    | Self::CancelledByBusiness
                    | Self::CancelledByBusinessRebookable
            )
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
