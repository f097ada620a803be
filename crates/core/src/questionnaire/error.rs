//! Questionnaire error types.

use thiserror::Error;

/// Errors raised while validating questionnaire definitions or answers.
#[derive(Debug, Error)]
pub enum QuestionnaireError {
    // ========== Definition Errors ==========
    /// Two questions share an id.
    #[error("Duplicate question id '{question_id}'")]
    DuplicateQuestionId {
        /// The repeated id.
        question_id: String,
    },

    /// A select question has no options.
    #[error("Question '{question_id}' must have at least one option")]
    NoOptions {
        /// The offending question's id.
        question_id: String,
    },

    /// Two options of one question share an id.
    #[error("Question '{question_id}' has duplicate option id '{option_id}'")]
    DuplicateOptionId {
        /// The question's id.
        question_id: String,
        /// The repeated option id.
        option_id: String,
    },

    /// Number bounds are inconsistent (min > max).
    #[error("Question '{question_id}' has min greater than max")]
    InvalidBounds {
        /// The offending question's id.
        question_id: String,
    },

    /// A fee is negative.
    #[error("Question '{question_id}' carries a negative fee")]
    NegativeFee {
        /// The offending question's id.
        question_id: String,
    },

    // ========== Answer Errors ==========
    /// A required question has no (non-empty) answer.
    #[error("Required question '{question_id}' is unanswered")]
    RequiredUnanswered {
        /// The unanswered question's id.
        question_id: String,
    },

    /// An answer references a question id not in the question set.
    #[error("Answer references unknown question '{question_id}'")]
    UnknownQuestion {
        /// The unknown id.
        question_id: String,
    },

    /// Two answers reference the same question.
    #[error("Question '{question_id}' is answered more than once")]
    DuplicateAnswer {
        /// The repeated question id.
        question_id: String,
    },

    /// The answer's value does not match the question's declared type.
    #[error("Answer to '{question_id}' has type {actual}, expected {expected}")]
    WrongAnswerType {
        /// The question's id.
        question_id: String,
        /// The declared question type.
        expected: &'static str,
        /// The supplied answer type.
        actual: &'static str,
    },

    /// A value constraint was violated; the message names the bound.
    #[error("Answer to '{question_id}' violates a constraint: {detail}")]
    ConstraintViolated {
        /// The question's id.
        question_id: String,
        /// The specific violated bound.
        detail: String,
    },
}

impl QuestionnaireError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateQuestionId { .. } => "DUPLICATE_QUESTION_ID",
            Self::NoOptions { .. } => "NO_OPTIONS",
            Self::DuplicateOptionId { .. } => "DUPLICATE_OPTION_ID",
            Self::InvalidBounds { .. } => "INVALID_BOUNDS",
            Self::NegativeFee { .. } => "NEGATIVE_FEE",
            Self::RequiredUnanswered { .. } => "REQUIRED_UNANSWERED",
            Self::UnknownQuestion { .. } => "UNKNOWN_QUESTION",
            Self::DuplicateAnswer { .. } => "DUPLICATE_ANSWER",
            Self::WrongAnswerType { .. } => "WRONG_ANSWER_TYPE",
            Self::ConstraintViolated { .. } => "CONSTRAINT_VIOLATED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }
}
