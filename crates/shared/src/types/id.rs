//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `UserId` where a `BookingId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a consumer account.");
typed_id!(BusinessId, "Unique identifier for a business account.");
typed_id!(VenueId, "Unique identifier for a venue.");
typed_id!(ClassTemplateId, "Unique identifier for a class template.");
typed_id!(ClassInstanceId, "Unique identifier for a scheduled class instance.");
typed_id!(BookingId, "Unique identifier for a booking.");
typed_id!(TransactionId, "Unique identifier for a credit transaction.");
typed_id!(PointTransactionId, "Unique identifier for a point transaction.");
typed_id!(DiscountRuleId, "Unique identifier for a discount rule.");
typed_id!(ReviewId, "Unique identifier for a review.");
typed_id!(SubscriptionEventId, "Unique identifier for a subscription event.");
