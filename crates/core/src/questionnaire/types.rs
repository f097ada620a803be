//! Questionnaire domain types.
//!
//! Question and option ids are caller-supplied strings, unique within one
//! questionnaire. Fees are credit amounts in minor units.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One choice of a select-type question, optionally carrying a fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Option id, unique within the question.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Fee charged when this option is chosen (minor units, >= 0).
    #[serde(default)]
    pub fee: Decimal,
}

/// Type-specific question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionConfig {
    /// Yes/no question.
    Boolean {
        /// Fee charged when answered `true`.
        #[serde(default)]
        fee_on_true: Decimal,
    },
    /// Exactly one option may be chosen.
    SingleSelect {
        /// The available options (non-empty).
        options: Vec<SelectOption>,
    },
    /// Any subset of options may be chosen.
    MultiSelect {
        /// The available options (non-empty).
        options: Vec<SelectOption>,
    },
    /// Numeric answer with optional bounds.
    Number {
        /// Inclusive lower bound.
        min: Option<Decimal>,
        /// Inclusive upper bound.
        max: Option<Decimal>,
        /// Whether only integers are accepted.
        #[serde(default)]
        integer_only: bool,
        /// Flat fee charged when any value is supplied.
        #[serde(default)]
        fee: Decimal,
    },
    /// Free-text answer.
    Text {
        /// Maximum accepted length in characters.
        max_length: Option<usize>,
        /// Flat fee charged when a non-empty answer is supplied.
        #[serde(default)]
        fee: Decimal,
    },
}

impl QuestionConfig {
    /// Returns the declared question type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::SingleSelect { .. } => "single_select",
            Self::MultiSelect { .. } => "multi_select",
            Self::Number { .. } => "number",
            Self::Text { .. } => "text",
        }
    }
}

/// One question in a questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question id, unique within the questionnaire.
    pub id: String,
    /// The question shown to the consumer.
    pub text: String,
    /// Whether an answer is mandatory.
    pub required: bool,
    /// Type-specific configuration.
    pub config: QuestionConfig,
}

/// A typed answer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Answer to a boolean question.
    Boolean(bool),
    /// Chosen option id of a single-select question.
    SingleSelect(String),
    /// Chosen option ids of a multi-select question.
    MultiSelect(Vec<String>),
    /// Numeric answer.
    Number(Decimal),
    /// Free-text answer.
    Text(String),
}

impl AnswerValue {
    /// Returns the answer's type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::SingleSelect(_) => "single_select",
            Self::MultiSelect(_) => "multi_select",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    /// Returns true when the value does not count as an answer.
    ///
    /// Any boolean counts (including `false`), as does any number
    /// (including 0); multi-selects need at least one choice and text
    /// needs at least one non-whitespace character.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Boolean(_) | Self::Number(_) => false,
            Self::SingleSelect(option_id) => option_id.trim().is_empty(),
            Self::MultiSelect(option_ids) => option_ids.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }

    /// Returns true when the value matches the question's declared type.
    #[must_use]
    pub fn matches(&self, config: &QuestionConfig) -> bool {
        matches!(
            (self, config),
            (Self::Boolean(_), QuestionConfig::Boolean { .. })
                | (Self::SingleSelect(_), QuestionConfig::SingleSelect { .. })
                | (Self::MultiSelect(_), QuestionConfig::MultiSelect { .. })
                | (Self::Number(_), QuestionConfig::Number { .. })
                | (Self::Text(_), QuestionConfig::Text { .. })
        )
    }
}

/// A caller-supplied answer, before fees are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAnswer {
    /// The answered question's id.
    pub question_id: String,
    /// The typed answer value.
    pub value: AnswerValue,
}

impl RawAnswer {
    /// Creates a raw answer.
    #[must_use]
    pub fn new(question_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

/// A recorded answer with its computed fee.
///
/// `fee_applied` is always computed by the engine, never caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// The answered question's id.
    pub question_id: String,
    /// The typed answer value.
    pub value: AnswerValue,
    /// The fee this answer contributed (minor units).
    pub fee_applied: Decimal,
}

/// Booking-time snapshot of a questionnaire and its answers.
///
/// Deep copy owned by the booking; later edits to the source questionnaire
/// never alter a past booking's recorded questions or fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireSnapshot {
    /// The frozen question list.
    pub questions: Vec<Question>,
    /// The answers with computed fees.
    pub answers: Vec<QuestionAnswer>,
    /// Sum of all applied fees.
    pub total_fees: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_type_names_line_up() {
        let config = QuestionConfig::MultiSelect { options: vec![] };
        let value = AnswerValue::MultiSelect(vec!["mat".to_string()]);
        assert_eq!(config.type_name(), value.type_name());
        assert!(value.matches(&config));
        assert!(!value.matches(&QuestionConfig::Boolean {
            fee_on_true: dec!(0)
        }));
    }

    #[test]
    fn test_config_json_shape() {
        let json = r#"{
            "id": "towel",
            "text": "Need a towel?",
            "required": false,
            "config": { "type": "boolean", "fee_on_true": "100" }
        }"#;
        let question: Question = serde_json::from_str(json).unwrap();
        assert_eq!(
            question.config,
            QuestionConfig::Boolean {
                fee_on_true: dec!(100)
            }
        );

        let value: AnswerValue =
            serde_json::from_str(r#"{ "type": "boolean", "value": true }"#).unwrap();
        assert_eq!(value, AnswerValue::Boolean(true));
    }

    #[test]
    fn test_emptiness_rules() {
        assert!(!AnswerValue::Boolean(false).is_empty());
        assert!(!AnswerValue::Number(dec!(0)).is_empty());
        assert!(AnswerValue::MultiSelect(vec![]).is_empty());
        assert!(AnswerValue::Text("   ".to_string()).is_empty());
        assert!(!AnswerValue::Text("note".to_string()).is_empty());
        assert!(AnswerValue::SingleSelect(String::new()).is_empty());
    }
}
