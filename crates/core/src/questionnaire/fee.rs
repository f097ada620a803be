//! Per-answer fee calculation.

use rust_decimal::Decimal;

use super::types::{AnswerValue, Question, QuestionConfig};

/// Computes the fee an answer contributes.
///
/// Assumes answers were already validated: unanswered questions and
/// type-mismatched values contribute zero, never raise.
#[must_use]
pub fn calculate_fee(question: &Question, value: Option<&AnswerValue>) -> Decimal {
    let Some(value) = value else {
        return Decimal::ZERO;
    };

    match (&question.config, value) {
        (QuestionConfig::Boolean { fee_on_true }, AnswerValue::Boolean(true)) => *fee_on_true,
        (QuestionConfig::SingleSelect { options }, AnswerValue::SingleSelect(option_id)) => options
            .iter()
            .find(|option| option.id == *option_id)
            .map_or(Decimal::ZERO, |option| option.fee),
        (QuestionConfig::MultiSelect { options }, AnswerValue::MultiSelect(option_ids)) => options
            .iter()
            .filter(|option| option_ids.contains(&option.id))
            .map(|option| option.fee)
            .sum(),
        (QuestionConfig::Number { fee, .. }, AnswerValue::Number(_)) => *fee,
        (QuestionConfig::Text { fee, .. }, AnswerValue::Text(text)) if !text.trim().is_empty() => {
            *fee
        }
        _ => Decimal::ZERO,
    }
}
