//! Point tracking error types.

use thiserror::Error;

use super::types::PointKind;

/// Errors that can occur while recording point transactions.
#[derive(Debug, Error)]
pub enum PointsError {
    /// Amount sign does not match the transaction kind, or is zero.
    #[error("Amount {amount} is invalid for a {kind} transaction")]
    InvalidAmount {
        /// The transaction kind.
        kind: PointKind,
        /// The offending amount.
        amount: i64,
    },

    /// Reason is missing or empty.
    #[error("Reason is required")]
    ReasonRequired,

    /// Redemption exceeds the user's balance.
    #[error("Insufficient points: balance {balance}, required {required}")]
    InsufficientPoints {
        /// The user's current balance.
        balance: i64,
        /// The points the redemption needs.
        required: i64,
    },

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PointsError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_POINT_AMOUNT",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } | Self::ReasonRequired => 400,
            Self::InsufficientPoints { .. } => 422,
            Self::Storage(_) => 500,
        }
    }
}
