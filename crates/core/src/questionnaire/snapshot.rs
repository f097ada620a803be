//! Booking-time questionnaire snapshots.

use rust_decimal::Decimal;

use super::fee::calculate_fee;
use super::types::{Question, QuestionAnswer, QuestionnaireSnapshot, RawAnswer};

/// Builds the immutable snapshot stored on a booking.
///
/// Attaches computed fees to every answer, sums them into `total_fees`,
/// and freezes the question list by value. Answers are assumed validated;
/// fee calculation never raises.
#[must_use]
pub fn build_snapshot(questions: &[Question], answers: &[RawAnswer]) -> QuestionnaireSnapshot {
    let answers: Vec<QuestionAnswer> = answers
        .iter()
        .map(|answer| {
            let question = questions
                .iter()
                .find(|question| question.id == answer.question_id);
            let fee_applied = question
                .map_or(Decimal::ZERO, |question| {
                    calculate_fee(question, Some(&answer.value))
                });
            QuestionAnswer {
                question_id: answer.question_id.clone(),
                value: answer.value.clone(),
                fee_applied,
            }
        })
        .collect();

    let total_fees = answers.iter().map(|answer| answer.fee_applied).sum();

    QuestionnaireSnapshot {
        questions: questions.to_vec(),
        answers,
        total_fees,
    }
}

/// Resolves the questionnaire that applies to a booking.
///
/// An instance-level questionnaire, when present and non-empty, fully
/// replaces the template's; it is never merged with it.
#[must_use]
pub fn resolve_effective<'a>(
    template_questions: &'a [Question],
    instance_questions: Option<&'a [Question]>,
) -> &'a [Question] {
    match instance_questions {
        Some(questions) if !questions.is_empty() => questions,
        _ => template_questions,
    }
}
