//! Failover reply generator.
//!
//! Tries the primary generator and falls back to the secondary on
//! transient failures (rate limiting, unavailable, timeout).
//!
//! ```ignore
//! let generator = FailoverReplyGenerator::new(Arc::new(openai))
//!     .with_fallback(Arc::new(TemplateReplyGenerator::new()));
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::ports::{ReplyError, ReplyGenerator, ReplyRequest};

pub struct FailoverReplyGenerator {
    primary: Arc<dyn ReplyGenerator>,
    fallback: Option<Arc<dyn ReplyGenerator>>,
}

impl FailoverReplyGenerator {
    pub fn new(primary: Arc<dyn ReplyGenerator>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn ReplyGenerator>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

#[async_trait]
impl ReplyGenerator for FailoverReplyGenerator {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, ReplyError> {
        match self.primary.generate(request).await {
            Ok(text) => Ok(text),
            Err(err) if err.is_retryable() => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        error = %err,
                        intent = %request.intent,
                        "Primary reply generator failed, using fallback"
                    );
                    fallback.generate(request).await
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }
}
