//! Loyalty points tracking.
//!
//! A simpler, one-sided sibling of the credit ledger: every earn, redeem,
//! or gift is an immutable transaction, and the denormalized per-user
//! balance is updated in the same step that appends it.

pub mod error;
pub mod service;
pub mod types;

pub use error::PointsError;
pub use service::{MemoryPoints, PointsService, PointsStore};
pub use types::{NewPointTransaction, PointKind, PointReceipt, PointTransaction};
