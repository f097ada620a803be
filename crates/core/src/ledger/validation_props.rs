//! Property-based tests for transaction draft validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use slotbook_shared::types::{BusinessId, UserId};

use super::error::LedgerError;
use super::types::{EntryDraft, TransactionDraft};
use super::validation::validate_draft;

/// Strategy for a positive amount in minor units (1 to 10,000,000).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|units| Decimal::new(units, 0))
}

fn draft(entries: Vec<EntryDraft>) -> TransactionDraft {
    TransactionDraft {
        idempotency_key: "key".to_string(),
        description: "desc".to_string(),
        entries,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any user-debit/business-credit pair of equal magnitude validates.
    #[test]
    fn prop_balanced_pair_accepted(amount in positive_amount()) {
        let entries = vec![
            EntryDraft::user(UserId::new(), -amount),
            EntryDraft::business(BusinessId::new(), amount),
        ];

        prop_assert!(validate_draft(&draft(entries)).is_ok());
    }

    /// Any pair whose amounts differ raises the double-entry violation.
    #[test]
    fn prop_unbalanced_pair_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);

        let entries = vec![
            EntryDraft::user(UserId::new(), -debit),
            EntryDraft::business(BusinessId::new(), credit),
        ];

        let result = validate_draft(&draft(entries));
        prop_assert!(
            matches!(result, Err(LedgerError::DoubleEntryViolation { .. })),
            "expected double-entry violation, got: {result:?}"
        );
    }

    /// A zero-amount entry is rejected regardless of the rest.
    #[test]
    fn prop_zero_amount_rejected(amount in positive_amount()) {
        let entries = vec![
            EntryDraft::user(UserId::new(), Decimal::ZERO),
            EntryDraft::business(BusinessId::new(), amount),
            EntryDraft::user(UserId::new(), -amount),
        ];

        let result = validate_draft(&draft(entries));
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidAmount { index: 0 })),
            "expected invalid amount, got: {result:?}"
        );
    }

    /// Splitting a debit across several entries stays balanced.
    #[test]
    fn prop_multi_entry_split_accepted(
        part_a in positive_amount(),
        part_b in positive_amount(),
    ) {
        let entries = vec![
            EntryDraft::user(UserId::new(), -part_a),
            EntryDraft::user(UserId::new(), -part_b),
            EntryDraft::business(BusinessId::new(), part_a + part_b),
        ];

        prop_assert!(validate_draft(&draft(entries)).is_ok());
    }

    /// Blank idempotency keys are always rejected before anything else.
    #[test]
    fn prop_blank_key_rejected(amount in positive_amount()) {
        let mut d = draft(vec![
            EntryDraft::user(UserId::new(), -amount),
            EntryDraft::business(BusinessId::new(), amount),
        ]);
        d.idempotency_key = " ".to_string();

        let result = validate_draft(&d);
        prop_assert!(matches!(result, Err(LedgerError::IdempotencyKeyRequired)));
    }
}
