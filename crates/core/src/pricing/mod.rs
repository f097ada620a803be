//! Booking price composition.
//!
//! Composes the base price, questionnaire fees, and the winning discount
//! into the final price. Answers are validated before any fee is computed
//! or any ledger entry is built.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::discount::{self, AppliedDiscount, DiscountRule};
use crate::questionnaire::{
    build_snapshot, resolve_effective, validate_answers, Question, QuestionnaireError,
    QuestionnaireSnapshot, RawAnswer,
};

/// Errors raised while pricing a booking.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The class's base price is negative.
    #[error("Base price {0} must not be negative")]
    NegativeBasePrice(Decimal),

    /// Answer validation failed.
    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),
}

impl PricingError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeBasePrice(_) => "NEGATIVE_BASE_PRICE",
            Self::Questionnaire(err) => err.error_code(),
        }
    }
}

/// Everything needed to price one booking.
#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    /// The class's base price in minor units.
    pub base_price: Decimal,
    /// The template's questionnaire.
    pub template_questions: &'a [Question],
    /// The instance-level questionnaire override, if any.
    pub instance_questions: Option<&'a [Question]>,
    /// The consumer's answers.
    pub answers: &'a [RawAnswer],
    /// The template's discount rules.
    pub discount_rules: &'a [DiscountRule],
    /// When the class starts.
    pub class_start: DateTime<Utc>,
    /// The pricing moment.
    pub now: DateTime<Utc>,
}

/// The priced booking, ready for the ledger and the booking record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingOutcome {
    /// The class's base price.
    pub original_price: Decimal,
    /// The frozen questionnaire snapshot (absent when no questions apply).
    pub questionnaire: Option<QuestionnaireSnapshot>,
    /// The winning discount, if any rule matched.
    pub applied_discount: Option<AppliedDiscount>,
    /// `max(0, base + fees - discount)`.
    pub final_price: Decimal,
}

/// Prices a booking.
///
/// # Errors
///
/// Returns a [`PricingError`] when the base price is negative or the
/// answers fail validation; no fee is computed in that case.
pub fn price_booking(input: &PricingInput<'_>) -> Result<PricingOutcome, PricingError> {
    if input.base_price < Decimal::ZERO {
        return Err(PricingError::NegativeBasePrice(input.base_price));
    }

    let effective = resolve_effective(input.template_questions, input.instance_questions);
    validate_answers(effective, input.answers)?;

    let questionnaire = if effective.is_empty() {
        None
    } else {
        Some(build_snapshot(effective, input.answers))
    };
    let total_fees = questionnaire
        .as_ref()
        .map_or(Decimal::ZERO, |snapshot| snapshot.total_fees);

    let applied_discount = discount::evaluate(input.discount_rules, input.class_start, input.now);
    let credits_saved = applied_discount
        .as_ref()
        .map_or(Decimal::ZERO, |discount| discount.credits_saved);

    // A discount larger than base + fees clamps to a free booking,
    // never a negative price.
    let final_price = (input.base_price + total_fees - credits_saved).max(Decimal::ZERO);

    Ok(PricingOutcome {
        original_price: input.base_price,
        questionnaire,
        applied_discount,
        final_price,
    })
}
