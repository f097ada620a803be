//! Idempotent transaction application.
//!
//! The service validates a draft, replays prior results under the same
//! idempotency key, checks debit sufficiency as a precondition, and then
//! applies every entry's delta in one atomic store commit. Either all
//! effects of a transaction are visible or none are.

use chrono::Utc;
use rust_decimal::Decimal;
use slotbook_shared::types::TransactionId;
use tracing::{debug, info};

use super::balance::{net_deltas, AccountBalance};
use super::error::LedgerError;
use super::types::{
    CreditTransaction, LedgerAccount, TransactionDraft, TransactionReceipt, TransactionStatus,
};
use super::validation::validate_draft;

/// A persisted transaction together with its receipt (present once completed).
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// The transaction.
    pub transaction: CreditTransaction,
    /// The receipt returned to the original caller; `None` until completed.
    pub receipt: Option<TransactionReceipt>,
}

/// Storage abstraction for the ledger.
///
/// The backing store must make `commit` atomic: the balance deltas and the
/// transaction record become visible together or not at all. Balances are
/// never updated outside `commit`.
pub trait LedgerStore {
    /// Looks up a transaction by idempotency key.
    fn find(&self, idempotency_key: &str) -> Option<TransactionRecord>;

    /// Returns the current balance of an account (zero if never touched).
    fn balance(&self, account: &LedgerAccount) -> Decimal;

    /// Atomically applies the balance deltas and persists the completed record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] if the write fails; no partial
    /// effects may remain in that case.
    fn commit(
        &mut self,
        record: TransactionRecord,
        deltas: &[(LedgerAccount, Decimal)],
    ) -> Result<(), LedgerError>;

    /// Persists a failed attempt so later retries under the same key are refused.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] if the write fails.
    fn record_failure(&mut self, transaction: CreditTransaction) -> Result<(), LedgerError>;
}

/// Ledger service applying validated transactions to balances.
pub struct LedgerService;

impl LedgerService {
    /// Applies a transaction draft with exactly-once semantics.
    ///
    /// Processing order:
    /// 1. Validate the draft (distinct error code per violated invariant).
    /// 2. Replay: a completed transaction under the same key returns its
    ///    stored receipt without re-applying effects; a failed one is
    ///    refused; a pending one may be retried.
    /// 3. Precondition: every net-debited user/business account must cover
    ///    its debit. Insufficiency records a failed attempt and aborts the
    ///    whole transaction.
    /// 4. Commit all deltas and the completed record atomically.
    ///
    /// # Errors
    ///
    /// Returns a structured [`LedgerError`] identifying the violated
    /// invariant; balances are unchanged on any error.
    pub fn apply<S: LedgerStore>(
        store: &mut S,
        draft: &TransactionDraft,
    ) -> Result<TransactionReceipt, LedgerError> {
        let entries = validate_draft(draft)?;

        if let Some(record) = store.find(&draft.idempotency_key) {
            match record.transaction.status {
                TransactionStatus::Completed => {
                    debug!(
                        idempotency_key = %draft.idempotency_key,
                        "replaying completed transaction"
                    );
                    return record.receipt.ok_or_else(|| {
                        LedgerError::Storage(
                            "completed transaction is missing its receipt".to_string(),
                        )
                    });
                }
                TransactionStatus::Failed => {
                    return Err(LedgerError::TransactionPreviouslyFailed {
                        idempotency_key: draft.idempotency_key.clone(),
                    });
                }
                // An earlier attempt stalled before completing; retry.
                TransactionStatus::Pending => {}
            }
        }

        let deltas = net_deltas(&entries);

        for (account, delta) in &deltas {
            if account.is_system() || delta.is_sign_positive() || delta.is_zero() {
                continue;
            }
            let balance = store.balance(account);
            if balance + delta < Decimal::ZERO {
                store.record_failure(CreditTransaction {
                    id: TransactionId::new(),
                    idempotency_key: draft.idempotency_key.clone(),
                    description: draft.description.clone(),
                    entries: entries.clone(),
                    status: TransactionStatus::Failed,
                    created_at: Utc::now(),
                })?;
                return Err(LedgerError::InsufficientBalance {
                    account: *account,
                    balance,
                    required: -*delta,
                });
            }
        }

        let transaction_id = TransactionId::new();
        let balances: Vec<AccountBalance> = deltas
            .iter()
            .map(|(account, delta)| AccountBalance::new(*account, store.balance(account) + delta))
            .collect();

        let receipt = TransactionReceipt {
            transaction_id,
            status: TransactionStatus::Completed,
            balances,
        };

        let record = TransactionRecord {
            transaction: CreditTransaction {
                id: transaction_id,
                idempotency_key: draft.idempotency_key.clone(),
                description: draft.description.clone(),
                entries,
                status: TransactionStatus::Completed,
                created_at: Utc::now(),
            },
            receipt: Some(receipt.clone()),
        };

        store.commit(record, &deltas)?;

        info!(
            idempotency_key = %draft.idempotency_key,
            transaction_id = %transaction_id,
            accounts = deltas.len(),
            "credit transaction applied"
        );

        Ok(receipt)
    }
}
