//! Business rule validation for transaction drafts.
//!
//! Checks run in a fixed order so callers get the most fundamental
//! violation first: idempotency key, description, entry presence, entry
//! shape, amounts, then the double-entry balance.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{CreditEntry, EntryDraft, LedgerAccount, TransactionDraft};

/// Validates a transaction draft and resolves its entries.
///
/// # Errors
///
/// Returns the first violated invariant as a [`LedgerError`] with a
/// distinct code per check.
pub fn validate_draft(draft: &TransactionDraft) -> Result<Vec<CreditEntry>, LedgerError> {
    if draft.idempotency_key.trim().is_empty() {
        return Err(LedgerError::IdempotencyKeyRequired);
    }

    if draft.description.trim().is_empty() {
        return Err(LedgerError::DescriptionRequired);
    }

    if draft.entries.is_empty() {
        return Err(LedgerError::EntriesRequired);
    }

    let mut entries = Vec::with_capacity(draft.entries.len());
    let mut sum = Decimal::ZERO;

    for (index, entry) in draft.entries.iter().enumerate() {
        let account = resolve_account(entry).ok_or(LedgerError::InvalidEntity { index })?;

        if entry.amount.is_zero() {
            return Err(LedgerError::InvalidAmount { index });
        }

        sum += entry.amount;
        entries.push(CreditEntry {
            account,
            amount: entry.amount,
        });
    }

    if !sum.is_zero() {
        return Err(LedgerError::DoubleEntryViolation { sum });
    }

    Ok(entries)
}

/// Resolves the single account reference of a draft entry.
///
/// Returns `None` when zero or more than one reference is populated.
fn resolve_account(entry: &EntryDraft) -> Option<LedgerAccount> {
    match (entry.user_id, entry.business_id, entry.system_account) {
        (Some(user_id), None, None) => Some(LedgerAccount::User(user_id)),
        (None, Some(business_id), None) => Some(LedgerAccount::Business(business_id)),
        (None, None, Some(system)) => Some(LedgerAccount::System(system)),
        _ => None,
    }
}
