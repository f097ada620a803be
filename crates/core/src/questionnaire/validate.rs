//! Definition and answer validation.

use rust_decimal::Decimal;
use std::collections::HashSet;

use super::error::QuestionnaireError;
use super::types::{AnswerValue, Question, QuestionConfig, RawAnswer, SelectOption};

/// Validates a questionnaire definition, raising on the first violation.
///
/// Rules: question ids unique; select questions have at least one option
/// with unique option ids; number bounds consistent; no negative fees.
///
/// # Errors
///
/// Returns the first violated rule as a [`QuestionnaireError`].
pub fn validate_definition(questions: &[Question]) -> Result<(), QuestionnaireError> {
    let mut seen = HashSet::new();

    for question in questions {
        if !seen.insert(question.id.as_str()) {
            return Err(QuestionnaireError::DuplicateQuestionId {
                question_id: question.id.clone(),
            });
        }

        match &question.config {
            QuestionConfig::Boolean { fee_on_true } => {
                check_fee(&question.id, *fee_on_true)?;
            }
            QuestionConfig::SingleSelect { options } | QuestionConfig::MultiSelect { options } => {
                validate_options(&question.id, options)?;
            }
            QuestionConfig::Number { min, max, fee, .. } => {
                if let (Some(min), Some(max)) = (min, max)
                    && min > max
                {
                    return Err(QuestionnaireError::InvalidBounds {
                        question_id: question.id.clone(),
                    });
                }
                check_fee(&question.id, *fee)?;
            }
            QuestionConfig::Text { fee, .. } => {
                check_fee(&question.id, *fee)?;
            }
        }
    }

    Ok(())
}

fn validate_options(
    question_id: &str,
    options: &[SelectOption],
) -> Result<(), QuestionnaireError> {
    if options.is_empty() {
        return Err(QuestionnaireError::NoOptions {
            question_id: question_id.to_string(),
        });
    }

    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.id.as_str()) {
            return Err(QuestionnaireError::DuplicateOptionId {
                question_id: question_id.to_string(),
                option_id: option.id.clone(),
            });
        }
        check_fee(question_id, option.fee)?;
    }

    Ok(())
}

fn check_fee(question_id: &str, fee: Decimal) -> Result<(), QuestionnaireError> {
    if fee < Decimal::ZERO {
        return Err(QuestionnaireError::NegativeFee {
            question_id: question_id.to_string(),
        });
    }
    Ok(())
}

/// Validates answers against a question set.
///
/// Checks, in order: every required question has a non-empty answer; every
/// answer references a known question exactly once; the answer's type
/// matches the question's declared type; value constraints hold (number
/// bounds and integrality, text length, option ids exist).
///
/// # Errors
///
/// Returns the first violation as a [`QuestionnaireError`].
pub fn validate_answers(
    questions: &[Question],
    answers: &[RawAnswer],
) -> Result<(), QuestionnaireError> {
    for question in questions {
        if !question.required {
            continue;
        }
        let answered = answers
            .iter()
            .any(|answer| answer.question_id == question.id && !answer.value.is_empty());
        if !answered {
            return Err(QuestionnaireError::RequiredUnanswered {
                question_id: question.id.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for answer in answers {
        let question = questions
            .iter()
            .find(|question| question.id == answer.question_id)
            .ok_or_else(|| QuestionnaireError::UnknownQuestion {
                question_id: answer.question_id.clone(),
            })?;

        // Fees are summed per answer, so a repeated answer would charge
        // the same question twice.
        if !seen.insert(answer.question_id.as_str()) {
            return Err(QuestionnaireError::DuplicateAnswer {
                question_id: answer.question_id.clone(),
            });
        }

        if !answer.value.matches(&question.config) {
            return Err(QuestionnaireError::WrongAnswerType {
                question_id: question.id.clone(),
                expected: question.config.type_name(),
                actual: answer.value.type_name(),
            });
        }

        validate_constraints(question, &answer.value)?;
    }

    Ok(())
}

fn validate_constraints(
    question: &Question,
    value: &AnswerValue,
) -> Result<(), QuestionnaireError> {
    let violation = |detail: String| QuestionnaireError::ConstraintViolated {
        question_id: question.id.clone(),
        detail,
    };

    match (&question.config, value) {
        (
            QuestionConfig::Number {
                min,
                max,
                integer_only,
                ..
            },
            AnswerValue::Number(number),
        ) => {
            if let Some(min) = min
                && number < min
            {
                return Err(violation(format!("value {number} is below min {min}")));
            }
            if let Some(max) = max
                && number > max
            {
                return Err(violation(format!("value {number} exceeds max {max}")));
            }
            if *integer_only && !number.is_integer() {
                return Err(violation(format!("value {number} must be an integer")));
            }
        }
        (QuestionConfig::Text { max_length, .. }, AnswerValue::Text(text)) => {
            if let Some(max_length) = max_length
                && text.chars().count() > *max_length
            {
                return Err(violation(format!(
                    "length {} exceeds max length {max_length}",
                    text.chars().count()
                )));
            }
        }
        (QuestionConfig::SingleSelect { options }, AnswerValue::SingleSelect(option_id)) => {
            if !option_id.is_empty() && !options.iter().any(|option| option.id == *option_id) {
                return Err(violation(format!("unknown option '{option_id}'")));
            }
        }
        (QuestionConfig::MultiSelect { options }, AnswerValue::MultiSelect(option_ids)) => {
            for option_id in option_ids {
                if !options.iter().any(|option| option.id == *option_id) {
                    return Err(violation(format!("unknown option '{option_id}'")));
                }
            }
        }
        // Booleans carry no further constraints; type match was checked.
        _ => {}
    }

    Ok(())
}
