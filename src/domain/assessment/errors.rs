//! Assessment errors.

use crate::domain::foundation::{DomainError, ErrorCode};

use super::QUESTION_COUNT;

/// Raised only when an `AssessmentState` has been corrupted; the engine's
/// own transitions can never produce one.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AssessmentError {
    #[error("Step index {step_index} outside protocol range 0..{}", QUESTION_COUNT)]
    StepOutOfRange { step_index: usize },

    #[error("Step index {step_index} does not match {responses} recorded responses")]
    ResponsesOutOfSync { step_index: usize, responses: usize },
}

impl From<AssessmentError> for DomainError {
    fn from(err: AssessmentError) -> Self {
        DomainError::new(ErrorCode::AssessmentProtocolViolation, err.to_string())
    }
}
