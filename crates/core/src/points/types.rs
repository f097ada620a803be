//! Point transaction types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use slotbook_shared::types::{BookingId, ClassInstanceId, PointTransactionId, UserId};
use std::fmt;

/// Why points moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    /// Points earned (cashback, promotions); amount must be positive.
    Earn,
    /// Points spent; amount must be negative.
    Redeem,
    /// Points gifted by the platform or a business; amount must be positive.
    Gift,
}

impl PointKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Redeem => "redeem",
            Self::Gift => "gift",
        }
    }
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for recording a point movement.
#[derive(Debug, Clone)]
pub struct NewPointTransaction {
    /// The user whose balance moves.
    pub user_id: UserId,
    /// Signed point amount.
    pub amount: i64,
    /// The kind of movement.
    pub kind: PointKind,
    /// Human-readable reason ("completed booking cashback", ...).
    pub reason: String,
    /// Booking this movement is linked to, if any.
    pub booking_id: Option<BookingId>,
    /// Class instance this movement is linked to, if any.
    pub class_instance_id: Option<ClassInstanceId>,
}

/// An immutable, persisted point transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    /// The transaction ID.
    pub id: PointTransactionId,
    /// The user whose balance moved.
    pub user_id: UserId,
    /// Signed point amount.
    pub amount: i64,
    /// The kind of movement.
    pub kind: PointKind,
    /// Human-readable reason.
    pub reason: String,
    /// Linked booking, if any.
    pub booking_id: Option<BookingId>,
    /// Linked class instance, if any.
    pub class_instance_id: Option<ClassInstanceId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Result of recording a point transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointReceipt {
    /// The new transaction's ID.
    pub transaction_id: PointTransactionId,
    /// The user's balance after the movement.
    pub balance: i64,
}
