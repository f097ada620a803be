//! Notification events produced by bookings and change propagation.
//!
//! Events describe what a user must be told, not how the message is
//! delivered. Delivery is a queued side effect; producing an event never
//! fails the operation that raised it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotbook_shared::types::{BookingId, BusinessId, ReviewId, UserId};

use crate::booking::CancelledBy;

/// A user-facing notification to deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A new booking was placed.
    BookingCreated {
        /// The new booking.
        booking_id: BookingId,
        /// The consumer who booked.
        consumer_id: UserId,
    },
    /// The business approved a booking that was awaiting approval.
    BookingApproved {
        /// The approved booking.
        booking_id: BookingId,
        /// The consumer to notify.
        consumer_id: UserId,
    },
    /// The business rejected a booking; the charge was refunded in full.
    BookingRejected {
        /// The rejected booking.
        booking_id: BookingId,
        /// The consumer to notify.
        consumer_id: UserId,
        /// The business's reason.
        reason: String,
    },
    /// A booking was cancelled by either side.
    BookingCancelled {
        /// The cancelled booking.
        booking_id: BookingId,
        /// The consumer to notify.
        consumer_id: UserId,
        /// Which side cancelled.
        cancelled_by: CancelledBy,
        /// True when the business offered a replacement slot.
        rebookable: bool,
    },
    /// A booked class moved to a different time or venue.
    BookingRescheduled {
        /// The affected booking.
        booking_id: BookingId,
        /// The consumer to notify.
        consumer_id: UserId,
    },
    /// A new user finished onboarding and received the welcome bonus.
    WelcomeBonusGranted {
        /// The recipient.
        user_id: UserId,
        /// Credits granted, in minor units.
        credits: Decimal,
    },
    /// A subscription renewal deposited credits.
    CreditsReceived {
        /// The recipient.
        user_id: UserId,
        /// Credits deposited, in minor units.
        credits: Decimal,
    },
    /// A review passed moderation and is now public.
    ReviewApproved {
        /// The approved review.
        review_id: ReviewId,
        /// The business being reviewed.
        business_id: BusinessId,
    },
}
