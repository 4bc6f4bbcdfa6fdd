//! Typed channel messages.

mod inbound;
mod outbound;

pub use inbound::{InboundMessage, MAX_TEXT_CHARS};
pub use outbound::{apology, quick_replies, Button, OutboundMessage};
