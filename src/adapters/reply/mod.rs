//! Reply generator adapters.
//!
//! - `TemplateReplyGenerator` - Fixed English/Hindi replies
//! - `OpenAIReplyGenerator` - Chat completions over HTTP
//! - `FailoverReplyGenerator` - Primary with fallback on transient errors

mod failover;
mod openai;
mod templates;

pub use failover::FailoverReplyGenerator;
pub use openai::{OpenAIReplyConfig, OpenAIReplyGenerator};
pub use templates::{TemplateReplyGenerator, GREETING_EN};
