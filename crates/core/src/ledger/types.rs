//! Ledger domain types for transaction creation and validation.
//!
//! Credits are a virtual currency held in minor units. Every balance
//! adjustment is an entry tied to exactly one account, and entries are
//! grouped into transactions that must sum to zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotbook_shared::types::{BusinessId, TransactionId, UserId};
use std::fmt;

/// Platform-owned accounts that absorb the counter-side of one-sided
/// operations (welcome bonuses, promotional credit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAccount {
    /// The main platform account.
    Platform,
    /// Promotional budget (welcome bonuses, campaigns).
    Promotions,
}

impl fmt::Display for SystemAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Platform => write!(f, "platform"),
            Self::Promotions => write!(f, "promotions"),
        }
    }
}

/// The account a ledger entry adjusts.
///
/// Exactly one party per entry; the enum makes the "exactly one entity
/// reference" invariant structural once a draft has been validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAccount {
    /// A consumer's credit balance.
    User(UserId),
    /// A business's credit balance.
    Business(BusinessId),
    /// A platform-owned account.
    System(SystemAccount),
}

impl LedgerAccount {
    /// Returns true for platform-owned accounts.
    ///
    /// System accounts are exempt from the sufficient-balance check and
    /// may go negative.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        matches!(self, Self::System(_))
    }
}

impl fmt::Display for LedgerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Business(id) => write!(f, "business:{id}"),
            Self::System(account) => write!(f, "system:{account}"),
        }
    }
}

/// Input for a single ledger entry, as supplied by a caller.
///
/// Callers populate exactly one of the three account references;
/// validation resolves the draft into a typed [`CreditEntry`] and rejects
/// drafts with zero or multiple references.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Consumer account reference.
    pub user_id: Option<UserId>,
    /// Business account reference.
    pub business_id: Option<BusinessId>,
    /// Platform account reference.
    pub system_account: Option<SystemAccount>,
    /// Signed amount in minor units (negative debits, positive credits).
    pub amount: Decimal,
}

impl EntryDraft {
    /// Creates a draft entry against a consumer account.
    #[must_use]
    pub fn user(user_id: UserId, amount: Decimal) -> Self {
        Self {
            user_id: Some(user_id),
            amount,
            ..Self::default()
        }
    }

    /// Creates a draft entry against a business account.
    #[must_use]
    pub fn business(business_id: BusinessId, amount: Decimal) -> Self {
        Self {
            business_id: Some(business_id),
            amount,
            ..Self::default()
        }
    }

    /// Creates a draft entry against a platform account.
    #[must_use]
    pub fn system(account: SystemAccount, amount: Decimal) -> Self {
        Self {
            system_account: Some(account),
            amount,
            ..Self::default()
        }
    }
}

/// A validated ledger entry: one signed adjustment to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEntry {
    /// The account this entry adjusts.
    pub account: LedgerAccount,
    /// Signed amount in minor units, never zero.
    pub amount: Decimal,
}

/// Input for creating a new credit transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    /// Caller-supplied token ensuring at-most-once application.
    pub idempotency_key: String,
    /// Human-readable description of the transaction.
    pub description: String,
    /// The entries to apply; must sum to zero.
    pub entries: Vec<EntryDraft>,
}

/// Transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Created but not yet applied; a retry under the same key may proceed.
    Pending,
    /// Applied to balances (immutable).
    Completed,
    /// Rejected; retries under the same key are refused.
    Failed,
}

impl TransactionStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns true once the transaction can no longer change.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted credit transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// The transaction ID.
    pub id: TransactionId,
    /// Caller-supplied idempotency key, unique across transactions.
    pub idempotency_key: String,
    /// Human-readable description.
    pub description: String,
    /// Validated entries; empty only for failed attempts rejected early.
    pub entries: Vec<CreditEntry>,
    /// Current status.
    pub status: TransactionStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Result of applying a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// The transaction ID.
    pub transaction_id: TransactionId,
    /// The status after application.
    pub status: TransactionStatus,
    /// Resulting balances of every touched account.
    pub balances: Vec<super::balance::AccountBalance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_as_str() {
        assert_eq!(TransactionStatus::Pending.as_str(), "pending");
        assert_eq!(TransactionStatus::Completed.as_str(), "completed");
        assert_eq!(TransactionStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_status_terminal() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn test_entry_draft_constructors() {
        let user = UserId::new();
        let draft = EntryDraft::user(user, dec!(-100));
        assert_eq!(draft.user_id, Some(user));
        assert!(draft.business_id.is_none());
        assert!(draft.system_account.is_none());
        assert_eq!(draft.amount, dec!(-100));
    }

    #[test]
    fn test_system_account_exemption() {
        assert!(LedgerAccount::System(SystemAccount::Platform).is_system());
        assert!(!LedgerAccount::User(UserId::new()).is_system());
        assert!(!LedgerAccount::Business(BusinessId::new()).is_system());
    }
}
