//! Time-based discount rules.
//!
//! Businesses attach condition/reduction pairs to a class template; at
//! booking time the engine evaluates them against the time remaining
//! until the class starts.

pub mod engine;
pub mod types;

pub use engine::{evaluate, validate_rules, DiscountRuleError};
pub use types::{AppliedDiscount, DiscountRule, DiscountValue, RuleCondition};
