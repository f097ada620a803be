//! In-memory ledger store.
//!
//! Backs tests and embedded use. The host storage layer provides a durable
//! implementation of [`LedgerStore`] with the same atomicity contract.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::LedgerError;
use super::service::{LedgerStore, TransactionRecord};
use super::types::{CreditTransaction, LedgerAccount};

/// In-memory [`LedgerStore`] implementation.
///
/// A `&mut self` commit is trivially atomic here; the balance map and the
/// transaction map are mutated in the same call.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    transactions: HashMap<String, TransactionRecord>,
    balances: HashMap<LedgerAccount, Decimal>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style opening balance, for test setup.
    #[must_use]
    pub fn with_balance(mut self, account: LedgerAccount, balance: Decimal) -> Self {
        self.balances.insert(account, balance);
        self
    }

    /// Overwrites an account balance directly (test setup only).
    pub fn set_balance(&mut self, account: LedgerAccount, balance: Decimal) {
        self.balances.insert(account, balance);
    }

    /// Inserts a pending record, simulating a stalled earlier attempt.
    pub fn insert_pending(&mut self, transaction: CreditTransaction) {
        self.transactions.insert(
            transaction.idempotency_key.clone(),
            TransactionRecord {
                transaction,
                receipt: None,
            },
        );
    }

    /// Number of stored transaction records.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

impl LedgerStore for MemoryLedger {
    fn find(&self, idempotency_key: &str) -> Option<TransactionRecord> {
        self.transactions.get(idempotency_key).cloned()
    }

    fn balance(&self, account: &LedgerAccount) -> Decimal {
        self.balances.get(account).copied().unwrap_or(Decimal::ZERO)
    }

    fn commit(
        &mut self,
        record: TransactionRecord,
        deltas: &[(LedgerAccount, Decimal)],
    ) -> Result<(), LedgerError> {
        for (account, delta) in deltas {
            *self.balances.entry(*account).or_insert(Decimal::ZERO) += delta;
        }
        self.transactions
            .insert(record.transaction.idempotency_key.clone(), record);
        Ok(())
    }

    fn record_failure(&mut self, transaction: CreditTransaction) -> Result<(), LedgerError> {
        self.transactions.insert(
            transaction.idempotency_key.clone(),
            TransactionRecord {
                transaction,
                receipt: None,
            },
        );
        Ok(())
    }
}
