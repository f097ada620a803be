//! Balance materialization helpers.
//!
//! The transaction log is the source of truth; materialized balances are
//! only ever updated inside the same atomic step that appends the entries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{CreditEntry, LedgerAccount};

/// A materialized account balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account: LedgerAccount,
    /// Current balance in minor units.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates a balance snapshot.
    #[must_use]
    pub const fn new(account: LedgerAccount, balance: Decimal) -> Self {
        Self { account, balance }
    }
}

/// Collapses entries into one net delta per account, preserving the order
/// in which accounts first appear.
///
/// A transaction may touch the same account more than once; sufficiency
/// is checked against the net effect, not entry by entry.
#[must_use]
pub fn net_deltas(entries: &[CreditEntry]) -> Vec<(LedgerAccount, Decimal)> {
    let mut deltas: Vec<(LedgerAccount, Decimal)> = Vec::new();

    for entry in entries {
        match deltas.iter_mut().find(|(account, _)| *account == entry.account) {
            Some((_, delta)) => *delta += entry.amount,
            None => deltas.push((entry.account, entry.amount)),
        }
    }

    deltas
}
