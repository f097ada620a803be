//! Booking record and transition output types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotbook_shared::types::{BookingId, BusinessId, ClassInstanceId, TransactionId, UserId};
use std::fmt;

use crate::discount::AppliedDiscount;
use crate::ledger::TransactionReceipt;
use crate::points::PointReceipt;
use crate::propagation::NotificationEvent;
use crate::questionnaire::QuestionnaireSnapshot;

use super::status::BookingStatus;

/// Which side cancelled a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    /// The consumer withdrew.
    Consumer,
    /// The business called the class off.
    Business,
}

impl fmt::Display for CancelledBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consumer => write!(f, "consumer"),
            Self::Business => write!(f, "business"),
        }
    }
}

/// A booking of one consumer onto one class instance.
///
/// Pricing context is frozen at creation time: the questionnaire snapshot
/// and the applied discount never change afterwards, even when the
/// template's configuration does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// The booking ID.
    pub id: BookingId,
    /// The consumer who booked.
    pub consumer_id: UserId,
    /// The business running the class.
    pub business_id: BusinessId,
    /// The class instance booked.
    pub class_instance_id: ClassInstanceId,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// The class's base price at booking time.
    pub original_price: Decimal,
    /// What the consumer was charged (base + fees - discount, >= 0).
    pub final_price: Decimal,
    /// Frozen questionnaire answers and fees, if any questions applied.
    pub questionnaire: Option<QuestionnaireSnapshot>,
    /// The winning discount at booking time, if any.
    pub applied_discount: Option<AppliedDiscount>,
    /// The charge transaction, absent for free bookings.
    pub charge_transaction_id: Option<TransactionId>,
    /// The refund transaction, set once a rejection or cancellation refunds.
    pub refund_transaction_id: Option<TransactionId>,
    /// Who cancelled, for the cancellation statuses.
    pub cancelled_by: Option<CancelledBy>,
    /// The business's reason, required on rejection.
    pub reject_reason: Option<String>,
    /// Soft-delete flag; deleted bookings keep their ledger history.
    pub deleted: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last transition time.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Marks the booking deleted without touching its financial trail.
    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.deleted = true;
        self.updated_at = now;
    }
}

/// What a transition produced besides the status change.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The status the booking moved to.
    pub status: BookingStatus,
    /// The refund receipt, when the transition moved money back.
    pub refund: Option<TransactionReceipt>,
    /// The cashback receipt, when completion awarded points.
    pub cashback: Option<PointReceipt>,
    /// Notifications for the change-propagation layer to deliver.
    pub events: Vec<NotificationEvent>,
}
