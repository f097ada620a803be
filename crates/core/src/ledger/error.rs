//! Ledger error types for validation and consistency failures.
//!
//! Each variant carries a stable code so callers can distinguish
//! "insufficient balance" from "malformed entry" from "already failed"
//! without string-matching.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::LedgerAccount;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Idempotency key is missing or empty.
    #[error("Idempotency key is required")]
    IdempotencyKeyRequired,

    /// Description is missing or empty.
    #[error("Description is required")]
    DescriptionRequired,

    /// Transaction has no entries.
    #[error("Transaction must have at least one entry")]
    EntriesRequired,

    /// Entry does not reference exactly one account.
    #[error("Entry {index} must reference exactly one of user, business, or system account")]
    InvalidEntity {
        /// Position of the offending entry.
        index: usize,
    },

    /// Entry amount is zero.
    #[error("Entry {index} amount must be non-zero")]
    InvalidAmount {
        /// Position of the offending entry.
        index: usize,
    },

    /// Entries do not sum to zero.
    #[error("Entries must sum to zero, got {sum}")]
    DoubleEntryViolation {
        /// The actual sum of all entry amounts.
        sum: Decimal,
    },

    // ========== Consistency Errors ==========
    /// A transaction with this idempotency key already failed.
    #[error("Transaction with idempotency key '{idempotency_key}' previously failed and cannot be retried")]
    TransactionPreviouslyFailed {
        /// The reused idempotency key.
        idempotency_key: String,
    },

    /// An account would be debited below zero.
    #[error("Insufficient balance on {account}: balance {balance}, required {required}")]
    InsufficientBalance {
        /// The account that cannot cover the debit.
        account: LedgerAccount,
        /// The account's current balance.
        balance: Decimal,
        /// The net debit the transaction would apply.
        required: Decimal,
    },

    // ========== Storage Errors ==========
    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IdempotencyKeyRequired => "IDEMPOTENCY_KEY_REQUIRED",
            Self::DescriptionRequired => "DESCRIPTION_REQUIRED",
            Self::EntriesRequired => "ENTRIES_REQUIRED",
            Self::InvalidEntity { .. } => "INVALID_ENTITY",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::DoubleEntryViolation { .. } => "DOUBLE_ENTRY_VIOLATION",
            Self::TransactionPreviouslyFailed { .. } => "TRANSACTION_PREVIOUSLY_FAILED",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::IdempotencyKeyRequired
            | Self::DescriptionRequired
            | Self::EntriesRequired
            | Self::InvalidEntity { .. }
            | Self::InvalidAmount { .. }
            | Self::DoubleEntryViolation { .. } => 400,

            Self::InsufficientBalance { .. } => 422,

            Self::TransactionPreviouslyFailed { .. } => 409,

            Self::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use slotbook_shared::types::UserId;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::IdempotencyKeyRequired.error_code(),
            "IDEMPOTENCY_KEY_REQUIRED"
        );
        assert_eq!(
            LedgerError::DescriptionRequired.error_code(),
            "DESCRIPTION_REQUIRED"
        );
        assert_eq!(LedgerError::EntriesRequired.error_code(), "ENTRIES_REQUIRED");
        assert_eq!(
            LedgerError::InvalidEntity { index: 0 }.error_code(),
            "INVALID_ENTITY"
        );
        assert_eq!(
            LedgerError::InvalidAmount { index: 2 }.error_code(),
            "INVALID_AMOUNT"
        );
        assert_eq!(
            LedgerError::DoubleEntryViolation { sum: dec!(5) }.error_code(),
            "DOUBLE_ENTRY_VIOLATION"
        );
        assert_eq!(
            LedgerError::TransactionPreviouslyFailed {
                idempotency_key: "k".to_string()
            }
            .error_code(),
            "TRANSACTION_PREVIOUSLY_FAILED"
        );
        assert_eq!(
            LedgerError::InsufficientBalance {
                account: LedgerAccount::User(UserId::new()),
                balance: dec!(50),
                required: dec!(1250),
            }
            .error_code(),
            "INSUFFICIENT_BALANCE"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(LedgerError::EntriesRequired.status_code(), 400);
        assert_eq!(
            LedgerError::InsufficientBalance {
                account: LedgerAccount::User(UserId::new()),
                balance: dec!(0),
                required: dec!(1),
            }
            .status_code(),
            422
        );
        assert_eq!(
            LedgerError::TransactionPreviouslyFailed {
                idempotency_key: "k".to_string()
            }
            .status_code(),
            409
        );
        assert_eq!(LedgerError::Storage(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::DoubleEntryViolation { sum: dec!(-250) };
        assert_eq!(err.to_string(), "Entries must sum to zero, got -250");

        let err = LedgerError::InvalidEntity { index: 1 };
        assert!(err.to_string().contains("Entry 1"));
    }
}
