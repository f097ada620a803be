//! Discount rule types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use slotbook_shared::types::DiscountRuleId;

/// When a rule applies, relative to the class start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Always applies.
    Always,
    /// Applies when at least `hours` remain before the class starts.
    HoursBeforeMin {
        /// The inclusive lower bound in hours.
        hours: u32,
    },
    /// Applies when at most `hours` remain before the class starts.
    HoursBeforeMax {
        /// The inclusive upper bound in hours.
        hours: u32,
    },
}

/// The reduction a rule grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountValue {
    /// A fixed credit amount off the price (minor units, >= 0).
    FixedAmount {
        /// The reduction in minor units.
        value: Decimal,
    },
}

impl DiscountValue {
    /// The credit reduction this value grants.
    #[must_use]
    pub const fn credits(&self) -> Decimal {
        match self {
            Self::FixedAmount { value } => *value,
        }
    }
}

/// A business-configured discount rule, owned by a class template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    /// The rule ID.
    pub id: DiscountRuleId,
    /// Display name ("Early bird", "Last minute").
    pub name: String,
    /// When the rule applies.
    pub condition: RuleCondition,
    /// The reduction granted.
    pub discount: DiscountValue,
}

/// The discount recorded on a booking, snapshotted at booking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    /// The winning rule's ID.
    pub rule_id: DiscountRuleId,
    /// The winning rule's name at booking time.
    pub name: String,
    /// Credits saved (minor units).
    pub credits_saved: Decimal,
}
