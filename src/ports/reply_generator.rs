//! Reply generator port.
//!
//! Produces display text for non-assessment turns. Output is never used
//! for triage decisions.

use async_trait::async_trait;

use crate::domain::foundation::Language;
use crate::domain::intent::{Entity, Intent};

/// Inputs for one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRequest {
    pub intent: Intent,
    pub entities: Vec<Entity>,
    pub language: Language,
    /// The user's message, for generators that can use it.
    pub user_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    #[error("Reply provider unavailable: {0}")]
    Unavailable(String),

    #[error("Reply provider rate limited")]
    RateLimited,

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Reply provider timed out")]
    Timeout,
}

impl ReplyError {
    /// Whether another provider may succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ReplyError::InvalidResponse(_))
    }
}

#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, ReplyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_generator_is_object_safe() {
        fn _accepts_dyn(_gen: &dyn ReplyGenerator) {}
    }

    #[test]
    fn invalid_responses_are_not_retryable() {
        assert!(ReplyError::Timeout.is_retryable());
        assert!(!ReplyError::InvalidResponse("empty".into()).is_retryable());
    }
}
