//! Double-entry credit ledger.
//!
//! This module implements the credit ledger core:
//! - Ledger entries tied to exactly one account (user, business, or system)
//! - Transaction drafts and validation rules
//! - Idempotent, all-or-nothing transaction application
//! - Balance materialization (only ever updated alongside the ledger append)
//! - Error types with stable codes for callers

pub mod balance;
pub mod error;
pub mod memory;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{net_deltas, AccountBalance};
pub use error::LedgerError;
pub use memory::MemoryLedger;
pub use service::{LedgerService, LedgerStore, TransactionRecord};
pub use types::{
    CreditEntry, CreditTransaction, EntryDraft, LedgerAccount, SystemAccount, TransactionDraft,
    TransactionReceipt, TransactionStatus,
};
