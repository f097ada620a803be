//! Property-based tests for idempotent transaction application.

use proptest::prelude::*;
use rust_decimal::Decimal;
use slotbook_shared::types::{BusinessId, UserId};

use super::memory::MemoryLedger;
use super::service::{LedgerService, LedgerStore};
use super::types::{EntryDraft, LedgerAccount, TransactionDraft};

/// Strategy for a positive amount in minor units.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|units| Decimal::new(units, 0))
}

fn charge(key: &str, user: UserId, business: BusinessId, amount: Decimal) -> TransactionDraft {
    TransactionDraft {
        idempotency_key: key.to_string(),
        description: "charge".to_string(),
        entries: vec![
            EntryDraft::user(user, -amount),
            EntryDraft::business(business, amount),
        ],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Applying the same key N times mutates balances exactly once and
    /// always yields the first receipt.
    #[test]
    fn prop_idempotent_replay(
        amount in positive_amount(),
        opening in positive_amount(),
        replays in 1usize..5,
    ) {
        prop_assume!(opening >= amount);

        let user = UserId::new();
        let business = BusinessId::new();
        let mut store = MemoryLedger::new().with_balance(LedgerAccount::User(user), opening);
        let draft = charge("k", user, business, amount);

        let first = LedgerService::apply(&mut store, &draft).unwrap();
        for _ in 0..replays {
            let replay = LedgerService::apply(&mut store, &draft).unwrap();
            prop_assert_eq!(&first, &replay);
        }

        prop_assert_eq!(store.balance(&LedgerAccount::User(user)), opening - amount);
        prop_assert_eq!(store.balance(&LedgerAccount::Business(business)), amount);
        prop_assert_eq!(store.transaction_count(), 1);
    }

    /// Credits are conserved: a completed transaction never changes the
    /// total across all touched accounts.
    #[test]
    fn prop_credits_conserved(
        amount in positive_amount(),
        opening in positive_amount(),
    ) {
        prop_assume!(opening >= amount);

        let user = UserId::new();
        let business = BusinessId::new();
        let mut store = MemoryLedger::new().with_balance(LedgerAccount::User(user), opening);

        LedgerService::apply(&mut store, &charge("k", user, business, amount)).unwrap();

        let total = store.balance(&LedgerAccount::User(user))
            + store.balance(&LedgerAccount::Business(business));
        prop_assert_eq!(total, opening);
    }

    /// A debit exceeding the balance leaves every balance untouched.
    #[test]
    fn prop_insufficiency_leaves_balances_unchanged(
        amount in positive_amount(),
        opening in positive_amount(),
    ) {
        prop_assume!(opening < amount);

        let user = UserId::new();
        let business = BusinessId::new();
        let mut store = MemoryLedger::new().with_balance(LedgerAccount::User(user), opening);

        let result = LedgerService::apply(&mut store, &charge("k", user, business, amount));
        prop_assert!(result.is_err());
        prop_assert_eq!(store.balance(&LedgerAccount::User(user)), opening);
        prop_assert_eq!(store.balance(&LedgerAccount::Business(business)), Decimal::ZERO);
    }
}
