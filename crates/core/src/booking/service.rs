//! Booking creation and lifecycle transitions.
//!
//! Every money-moving transition drives exactly one ledger transaction,
//! and the ledger step always precedes the status write: a booking is
//! never marked rejected or cancelled while the refund is unpaid.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use slotbook_shared::types::{BookingId, BusinessId, ClassInstanceId, UserId};
use tracing::info;

use crate::ledger::{EntryDraft, LedgerService, LedgerStore, TransactionDraft};
use crate::points::{NewPointTransaction, PointKind, PointsService, PointsStore};
use crate::pricing::{price_booking, PricingInput};
use crate::propagation::NotificationEvent;

use super::error::BookingError;
use super::reversal::{build_partial_refund_draft, build_refund_draft};
use super::status::BookingStatus;
use super::types::{Booking, CancelledBy, TransitionOutcome};

/// The idempotency key of a booking's charge transaction.
///
/// One charge per booking: re-applying the charge draft for an existing
/// booking replays the stored receipt instead of debiting the consumer
/// twice, and refunds find the original entries under this key.
#[must_use]
pub fn charge_key(booking_id: BookingId) -> String {
    format!("booking-charge-{booking_id}")
}

/// Input for creating a booking.
#[derive(Debug, Clone)]
pub struct NewBookingRequest<'a> {
    /// The consumer booking the class.
    pub consumer_id: UserId,
    /// The business running the class.
    pub business_id: BusinessId,
    /// The class instance being booked.
    pub class_instance_id: ClassInstanceId,
    /// Whether the class template requires business approval.
    pub requires_approval: bool,
    /// Everything needed to price the booking.
    pub pricing: PricingInput<'a>,
}

/// Timing and reason context for a transition.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    /// The transition moment.
    pub now: DateTime<Utc>,
    /// When the booked class starts.
    pub class_start: DateTime<Utc>,
    /// The business's reason; required for rejections.
    pub reason: Option<&'a str>,
}

/// Decides how much a consumer-initiated cancellation refunds.
pub trait RefundPolicy {
    /// The amount to move back to the consumer, in minor units.
    fn refund_amount(
        &self,
        booking: &Booking,
        class_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Decimal;
}

/// Full refund when the consumer cancels at least `window_hours` before
/// the class starts, nothing afterwards.
#[derive(Debug, Clone, Copy)]
pub struct WindowRefundPolicy {
    /// The cancellation window in hours.
    pub window_hours: u32,
}

impl RefundPolicy for WindowRefundPolicy {
    fn refund_amount(
        &self,
        booking: &Booking,
        class_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Decimal {
        let window_seconds = i64::from(self.window_hours) * 3600;
        if (class_start - now).num_seconds() >= window_seconds {
            booking.final_price
        } else {
            Decimal::ZERO
        }
    }
}

/// Decides how many points a completed booking awards.
pub trait CashbackPolicy {
    /// The points to award; zero awards nothing.
    fn points(&self, booking: &Booking) -> i64;
}

/// Awards a percentage of the final price as points, rounded down.
#[derive(Debug, Clone, Copy)]
pub struct PercentCashback {
    /// Percentage of the final price, 0 disables cashback.
    pub percent: u32,
}

impl CashbackPolicy for PercentCashback {
    fn points(&self, booking: &Booking) -> i64 {
        if self.percent == 0 {
            return 0;
        }
        let earned = booking.final_price * Decimal::from(self.percent) / Decimal::from(100);
        earned.floor().to_i64().unwrap_or(0)
    }
}

/// Service creating bookings and driving their lifecycle.
pub struct BookingService;

impl BookingService {
    /// Prices and creates a booking, charging the consumer.
    ///
    /// Free bookings (final price zero) skip the ledger entirely. The
    /// booking only exists once the charge has been applied, so an
    /// insufficient balance leaves no booking behind. Returns the new
    /// booking together with its single creation notification.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError`] when pricing fails or the charge is
    /// refused; no booking record is produced in that case.
    pub fn create<S: LedgerStore>(
        store: &mut S,
        request: &NewBookingRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<(Booking, Vec<NotificationEvent>), BookingError> {
        let outcome = price_booking(&request.pricing)?;
        let booking_id = BookingId::new();

        let charge_transaction_id = if outcome.final_price > Decimal::ZERO {
            let draft = TransactionDraft {
                idempotency_key: charge_key(booking_id),
                description: format!("Charge for booking {booking_id}"),
                entries: vec![
                    EntryDraft::user(request.consumer_id, -outcome.final_price),
                    EntryDraft::business(request.business_id, outcome.final_price),
                ],
            };
            Some(LedgerService::apply(store, &draft)?.transaction_id)
        } else {
            None
        };

        let status = BookingStatus::initial(request.requires_approval);
        info!(
            booking_id = %booking_id,
            consumer_id = %request.consumer_id,
            status = %status,
            final_price = %outcome.final_price,
            "booking created"
        );

        let booking = Booking {
            id: booking_id,
            consumer_id: request.consumer_id,
            business_id: request.business_id,
            class_instance_id: request.class_instance_id,
            status,
            original_price: outcome.original_price,
            final_price: outcome.final_price,
            questionnaire: outcome.questionnaire,
            applied_discount: outcome.applied_discount,
            charge_transaction_id,
            refund_transaction_id: None,
            cancelled_by: None,
            reject_reason: None,
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        let events = vec![NotificationEvent::BookingCreated {
            booking_id,
            consumer_id: request.consumer_id,
        }];
        Ok((booking, events))
    }

    /// Moves a booking to `target`, performing the transition's money and
    /// point effects first.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidTransition`] for moves outside the
    /// state machine, and propagates ledger or point errors. The booking
    /// is unchanged on any error.
    pub fn transition<L: LedgerStore, P: PointsStore>(
        ledger: &mut L,
        points: &mut P,
        booking: &mut Booking,
        target: BookingStatus,
        ctx: &TransitionContext<'_>,
        refund_policy: &dyn RefundPolicy,
        cashback_policy: &dyn CashbackPolicy,
    ) -> Result<TransitionOutcome, BookingError> {
        if !BookingStatus::is_valid_transition(booking.status, target) {
            return Err(BookingError::InvalidTransition {
                from: booking.status,
                to: target,
            });
        }

        let mut outcome = TransitionOutcome {
            status: target,
            refund: None,
            cashback: None,
            events: Vec::new(),
        };

        match target {
            BookingStatus::Pending => {
                outcome.events.push(NotificationEvent::BookingApproved {
                    booking_id: booking.id,
                    consumer_id: booking.consumer_id,
                });
            }
            BookingStatus::RejectedByBusiness => {
                let reason = ctx
                    .reason
                    .map(str::trim)
                    .filter(|reason| !reason.is_empty())
                    .ok_or(BookingError::RejectionReasonRequired)?;

                if booking.charge_transaction_id.is_some() {
                    let record = ledger
                        .find(&charge_key(booking.id))
                        .ok_or(BookingError::ChargeNotFound {
                            booking_id: booking.id,
                        })?;
                    let draft =
                        build_refund_draft(booking.id, &record.transaction.entries, reason);
                    let receipt = LedgerService::apply(ledger, &draft)?;
                    booking.refund_transaction_id = Some(receipt.transaction_id);
                    outcome.refund = Some(receipt);
                }

                booking.reject_reason = Some(reason.to_string());
                outcome.events.push(NotificationEvent::BookingRejected {
                    booking_id: booking.id,
                    consumer_id: booking.consumer_id,
                    reason: reason.to_string(),
                });
            }
            BookingStatus::Completed => {
                let earned = cashback_policy.points(booking);
                if earned > 0 {
                    let receipt = PointsService::record(
                        points,
                        NewPointTransaction {
                            user_id: booking.consumer_id,
                            amount: earned,
                            kind: PointKind::Earn,
                            reason: "completed booking cashback".to_string(),
                            booking_id: Some(booking.id),
                            class_instance_id: Some(booking.class_instance_id),
                        },
                    )?;
                    outcome.cashback = Some(receipt);
                }
            }
            BookingStatus::NoShow => {}
            BookingStatus::CancelledByConsumer
            | BookingStatus::CancelledByBusiness
            | BookingStatus::CancelledByBusinessRebookable => {
                let cancelled_by = if target == BookingStatus::CancelledByConsumer {
                    CancelledBy::Consumer
                } else {
                    CancelledBy::Business
                };
                // Business cancellations always refund in full; consumer
                // cancellations go through the policy.
                let amount = match cancelled_by {
                    CancelledBy::Business => booking.final_price,
                    CancelledBy::Consumer => {
                        refund_policy.refund_amount(booking, ctx.class_start, ctx.now)
                    }
                };

                if amount > Decimal::ZERO && booking.charge_transaction_id.is_some() {
                    let draft = build_partial_refund_draft(
                        booking.id,
                        booking.consumer_id,
                        booking.business_id,
                        amount,
                        "booking cancelled",
                    );
                    let receipt = LedgerService::apply(ledger, &draft)?;
                    booking.refund_transaction_id = Some(receipt.transaction_id);
                    outcome.refund = Some(receipt);
                }

                booking.cancelled_by = Some(cancelled_by);
                outcome.events.push(NotificationEvent::BookingCancelled {
                    booking_id: booking.id,
                    consumer_id: booking.consumer_id,
                    cancelled_by,
                    rebookable: target == BookingStatus::CancelledByBusinessRebookable,
                });
            }
            // Unreachable: no transition leads back to awaiting approval.
            BookingStatus::AwaitingApproval => {
                return Err(BookingError::InvalidTransition {
                    from: booking.status,
                    to: target,
                })
            }
        }

        info!(
            booking_id = %booking.id,
            from = %booking.status,
            to = %target,
            refunded = outcome.refund.is_some(),
            "booking transitioned"
        );
        booking.status = target;
        booking.updated_at = ctx.now;

        Ok(outcome)
    }
}
