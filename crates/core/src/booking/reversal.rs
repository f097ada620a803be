//! Refund transaction construction.
//!
//! Refunds are ordinary balanced transactions built from the original
//! charge, never balance edits. A full refund reverses every original
//! entry by flipping its sign; a partial refund moves a policy-determined
//! amount from the business back to the consumer.

use rust_decimal::Decimal;
use slotbook_shared::types::{BookingId, BusinessId, UserId};

use crate::ledger::{CreditEntry, EntryDraft, LedgerAccount, TransactionDraft};

/// The idempotency key of a booking's refund transaction.
///
/// One booking gets at most one refund, so keying by booking ID makes
/// refund retries replay instead of double-paying.
#[must_use]
pub fn refund_key(booking_id: BookingId) -> String {
    format!("booking-refund-{booking_id}")
}

/// Builds a draft reversing every entry of the original charge.
#[must_use]
pub fn build_refund_draft(
    booking_id: BookingId,
    original_entries: &[CreditEntry],
    reason: &str,
) -> TransactionDraft {
    TransactionDraft {
        idempotency_key: refund_key(booking_id),
        description: format!("Refund for booking {booking_id}: {reason}"),
        entries: original_entries
            .iter()
            .map(|entry| draft_entry(entry.account, -entry.amount))
            .collect(),
    }
}

/// Builds a draft refunding `amount` from the business to the consumer.
#[must_use]
pub fn build_partial_refund_draft(
    booking_id: BookingId,
    consumer_id: UserId,
    business_id: BusinessId,
    amount: Decimal,
    reason: &str,
) -> TransactionDraft {
    TransactionDraft {
        idempotency_key: refund_key(booking_id),
        description: format!("Refund for booking {booking_id}: {reason}"),
        entries: vec![
            EntryDraft::business(business_id, -amount),
            EntryDraft::user(consumer_id, amount),
        ],
    }
}

fn draft_entry(account: LedgerAccount, amount: Decimal) -> EntryDraft {
    match account {
        LedgerAccount::User(id) => EntryDraft::user(id, amount),
        LedgerAccount::Business(id) => EntryDraft::business(id, amount),
        LedgerAccount::System(system) => EntryDraft::system(system, amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_full_refund_flips_every_entry() {
        let booking = BookingId::new();
        let consumer = UserId::new();
        let business = BusinessId::new();
        let original = vec![
            CreditEntry {
                account: LedgerAccount::User(consumer),
                amount: dec!(-1250),
            },
            CreditEntry {
                account: LedgerAccount::Business(business),
                amount: dec!(1250),
            },
        ];

        let draft = build_refund_draft(booking, &original, "class rejected");

        assert_eq!(draft.idempotency_key, format!("booking-refund-{booking}"));
        assert_eq!(draft.entries.len(), 2);
        assert_eq!(draft.entries[0].user_id, Some(consumer));
        assert_eq!(draft.entries[0].amount, dec!(1250));
        assert_eq!(draft.entries[1].business_id, Some(business));
        assert_eq!(draft.entries[1].amount, dec!(-1250));
    }

    #[test]
    fn test_partial_refund_balances_to_zero() {
        let booking = BookingId::new();
        let consumer = UserId::new();
        let business = BusinessId::new();

        let draft =
            build_partial_refund_draft(booking, consumer, business, dec!(600), "cancelled");

        let sum: Decimal = draft.entries.iter().map(|entry| entry.amount).sum();
        assert_eq!(sum, dec!(0));
        assert_eq!(draft.entries[0].business_id, Some(business));
        assert_eq!(draft.entries[0].amount, dec!(-600));
        assert_eq!(draft.entries[1].user_id, Some(consumer));
        assert_eq!(draft.entries[1].amount, dec!(600));
    }
}
