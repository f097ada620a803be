//! Discount rule evaluation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use slotbook_shared::types::DiscountRuleId;
use thiserror::Error;

use super::types::{AppliedDiscount, DiscountRule, RuleCondition};

/// Errors raised while validating discount rules.
#[derive(Debug, Error)]
pub enum DiscountRuleError {
    /// A rule's reduction is negative.
    #[error("Discount rule {rule_id} has a negative value")]
    NegativeValue {
        /// The offending rule's ID.
        rule_id: DiscountRuleId,
    },
}

impl DiscountRuleError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeValue { .. } => "NEGATIVE_DISCOUNT_VALUE",
        }
    }
}

/// Validates a template's discount rules.
///
/// # Errors
///
/// Returns [`DiscountRuleError::NegativeValue`] for the first rule whose
/// reduction is negative.
pub fn validate_rules(rules: &[DiscountRule]) -> Result<(), DiscountRuleError> {
    for rule in rules {
        if rule.discount.credits() < Decimal::ZERO {
            return Err(DiscountRuleError::NegativeValue { rule_id: rule.id });
        }
    }
    Ok(())
}

/// Evaluates a template's rules against the time remaining until class start.
///
/// When several rules match, the largest reduction wins; ties are broken
/// by rule insertion order. Returns `None` when no rule matches.
#[must_use]
pub fn evaluate(
    rules: &[DiscountRule],
    class_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<AppliedDiscount> {
    let seconds_until_start = (class_start - now).num_seconds();

    let winner = rules
        .iter()
        .filter(|rule| condition_matches(rule.condition, seconds_until_start))
        .fold(None::<&DiscountRule>, |best, rule| match best {
            // Strict comparison keeps the earlier-inserted rule on ties.
            Some(best) if rule.discount.credits() <= best.discount.credits() => Some(best),
            _ => Some(rule),
        })?;

    Some(AppliedDiscount {
        rule_id: winner.id,
        name: winner.name.clone(),
        credits_saved: winner.discount.credits(),
    })
}

fn condition_matches(condition: RuleCondition, seconds_until_start: i64) -> bool {
    match condition {
        RuleCondition::Always => true,
        RuleCondition::HoursBeforeMin { hours } => {
            seconds_until_start >= i64::from(hours) * 3600
        }
        RuleCondition::HoursBeforeMax { hours } => {
            seconds_until_start <= i64::from(hours) * 3600
        }
    }
}
