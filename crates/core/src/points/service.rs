//! Point recording service.

use chrono::Utc;
use slotbook_shared::types::{PointTransactionId, UserId};
use std::collections::HashMap;
use tracing::info;

use super::error::PointsError;
use super::types::{NewPointTransaction, PointKind, PointReceipt, PointTransaction};

/// Storage abstraction for point transactions.
///
/// `append` must update the denormalized balance and the history in one
/// atomic step; the history is the source of truth for the balance.
pub trait PointsStore {
    /// Returns a user's current point balance (zero if never touched).
    fn balance(&self, user_id: UserId) -> i64;

    /// Atomically appends a transaction and moves the balance.
    ///
    /// # Errors
    ///
    /// Returns [`PointsError::Storage`] if the write fails.
    fn append(&mut self, transaction: PointTransaction) -> Result<(), PointsError>;
}

/// Service recording point movements against a store.
pub struct PointsService;

impl PointsService {
    /// Records a point movement.
    ///
    /// Earn and gift amounts must be positive, redemptions negative;
    /// a redemption may not exceed the user's balance.
    ///
    /// # Errors
    ///
    /// Returns a [`PointsError`] on sign mismatch, missing reason, or
    /// insufficient points; the store is untouched on any error.
    pub fn record<S: PointsStore>(
        store: &mut S,
        input: NewPointTransaction,
    ) -> Result<PointReceipt, PointsError> {
        let valid_sign = match input.kind {
            PointKind::Earn | PointKind::Gift => input.amount > 0,
            PointKind::Redeem => input.amount < 0,
        };
        if !valid_sign {
            return Err(PointsError::InvalidAmount {
                kind: input.kind,
                amount: input.amount,
            });
        }

        if input.reason.trim().is_empty() {
            return Err(PointsError::ReasonRequired);
        }

        let balance = store.balance(input.user_id);
        if input.kind == PointKind::Redeem && balance + input.amount < 0 {
            return Err(PointsError::InsufficientPoints {
                balance,
                required: -input.amount,
            });
        }

        let transaction = PointTransaction {
            id: PointTransactionId::new(),
            user_id: input.user_id,
            amount: input.amount,
            kind: input.kind,
            reason: input.reason,
            booking_id: input.booking_id,
            class_instance_id: input.class_instance_id,
            created_at: Utc::now(),
        };
        let receipt = PointReceipt {
            transaction_id: transaction.id,
            balance: balance + transaction.amount,
        };

        store.append(transaction)?;

        info!(
            user_id = %input.user_id,
            kind = %input.kind,
            amount = input.amount,
            balance = receipt.balance,
            "point transaction recorded"
        );

        Ok(receipt)
    }
}

/// In-memory [`PointsStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryPoints {
    history: Vec<PointTransaction>,
    balances: HashMap<UserId, i64>,
}

impl MemoryPoints {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All transactions recorded for a user, in insertion order.
    #[must_use]
    pub fn history_for(&self, user_id: UserId) -> Vec<&PointTransaction> {
        self.history
            .iter()
            .filter(|txn| txn.user_id == user_id)
            .collect()
    }
}

impl PointsStore for MemoryPoints {
    fn balance(&self, user_id: UserId) -> i64 {
        self.balances.get(&user_id).copied().unwrap_or(0)
    }

    fn append(&mut self, transaction: PointTransaction) -> Result<(), PointsError> {
        *self.balances.entry(transaction.user_id).or_insert(0) += transaction.amount;
        self.history.push(transaction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn earn(user: UserId, amount: i64) -> NewPointTransaction {
        NewPointTransaction {
            user_id: user,
            amount,
            kind: PointKind::Earn,
            reason: "completed booking cashback".to_string(),
            booking_id: None,
            class_instance_id: None,
        }
    }

    fn redeem(user: UserId, amount: i64) -> NewPointTransaction {
        NewPointTransaction {
            user_id: user,
            amount: -amount,
            kind: PointKind::Redeem,
            reason: "discount redemption".to_string(),
            booking_id: None,
            class_instance_id: None,
        }
    }

    #[test]
    fn test_earn_then_redeem() {
        let user = UserId::new();
        let mut store = MemoryPoints::new();

        let receipt = PointsService::record(&mut store, earn(user, 100)).unwrap();
        assert_eq!(receipt.balance, 100);

        let receipt = PointsService::record(&mut store, redeem(user, 40)).unwrap();
        assert_eq!(receipt.balance, 60);
        assert_eq!(store.balance(user), 60);
    }

    #[test]
    fn test_redeem_beyond_balance_rejected() {
        let user = UserId::new();
        let mut store = MemoryPoints::new();
        PointsService::record(&mut store, earn(user, 30)).unwrap();

        let err = PointsService::record(&mut store, redeem(user, 50)).unwrap_err();
        assert!(matches!(
            err,
            PointsError::InsufficientPoints {
                balance: 30,
                required: 50
            }
        ));
        assert_eq!(store.balance(user), 30);
    }

    #[test]
    fn test_sign_mismatch_rejected() {
        let user = UserId::new();
        let mut store = MemoryPoints::new();

        let mut bad_earn = earn(user, 100);
        bad_earn.amount = -100;
        assert!(matches!(
            PointsService::record(&mut store, bad_earn),
            Err(PointsError::InvalidAmount { .. })
        ));

        let mut bad_redeem = redeem(user, 40);
        bad_redeem.amount = 40;
        assert!(matches!(
            PointsService::record(&mut store, bad_redeem),
            Err(PointsError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_empty_reason_rejected() {
        let user = UserId::new();
        let mut store = MemoryPoints::new();
        let mut input = earn(user, 100);
        input.reason = "  ".to_string();
        assert!(matches!(
            PointsService::record(&mut store, input),
            Err(PointsError::ReasonRequired)
        ));
    }

    #[test]
    fn test_gift_requires_positive_amount() {
        let user = UserId::new();
        let mut store = MemoryPoints::new();
        let input = NewPointTransaction {
            user_id: user,
            amount: 250,
            kind: PointKind::Gift,
            reason: "birthday gift".to_string(),
            booking_id: None,
            class_instance_id: None,
        };
        let receipt = PointsService::record(&mut store, input).unwrap();
        assert_eq!(receipt.balance, 250);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The denormalized balance always equals the sum of the history.
        #[test]
        fn prop_balance_equals_history_sum(moves in proptest::collection::vec(1i64..1000, 1..20)) {
            let user = UserId::new();
            let mut store = MemoryPoints::new();

            for (i, amount) in moves.iter().enumerate() {
                // Alternate earns and (attempted) redemptions.
                let input = if i % 2 == 0 {
                    earn(user, *amount)
                } else {
                    redeem(user, *amount)
                };
                // Redemptions beyond the balance are allowed to fail.
                let _ = PointsService::record(&mut store, input);
            }

            let sum: i64 = store.history_for(user).iter().map(|txn| txn.amount).sum();
            prop_assert_eq!(store.balance(user), sum);
            prop_assert!(store.balance(user) >= 0);
        }
    }
}
