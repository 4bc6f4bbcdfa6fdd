//! Session-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, SessionStatus, ValidationError};

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session no longer accepts input.
    #[error("Session {id} is {status} and cannot accept input")]
    Closed { id: SessionId, status: SessionStatus },

    /// Lifecycle edge not allowed by the state machine.
    #[error("Invalid state: {0}")]
    InvalidTransition(String),
}

impl SessionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Closed { .. } => ErrorCode::SessionClosed,
            SessionError::InvalidTransition(_) => ErrorCode::InvalidStateTransition,
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::InvalidTransition(err.to_string())
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
