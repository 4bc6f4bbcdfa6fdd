//! Escalation: when to hand a conversation to a human health worker.

mod lexicon;
pub mod messages;
mod policy;
mod values;

pub use lexicon::{mentions_emergency, requests_human};
pub use policy::{EscalationPolicy, REPEATED_INTENT_WINDOW};
pub use values::{EscalationDecision, EscalationReason, Priority};
