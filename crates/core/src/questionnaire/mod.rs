//! Pre-booking questionnaire engine.
//!
//! Pure functions over plain data, no I/O:
//! - Definition validation (unique ids, consistent bounds, no negative fees)
//! - Answer validation against a definition
//! - Per-answer fee calculation
//! - Booking-time snapshots that freeze questions and fees by value
//! - Template/instance questionnaire resolution

pub mod error;
pub mod fee;
pub mod snapshot;
pub mod types;
pub mod validate;

pub use error::QuestionnaireError;
pub use fee::calculate_fee;
pub use snapshot::{build_snapshot, resolve_effective};
pub use types::{
    AnswerValue, Question, QuestionAnswer, QuestionConfig, QuestionnaireSnapshot, RawAnswer,
    SelectOption,
};
pub use validate::{validate_answers, validate_definition};
