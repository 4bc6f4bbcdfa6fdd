//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `intent` - Keyword/pattern intent classification and entity extraction
//! - `triage` - Symptom rule table shared by assessment and detection
//! - `assessment` - Five-question symptom assessment protocol
//! - `escalation` - Hand-off policy and user-facing escalation texts
//! - `session` - Session aggregate, conversation context and events
//! - `messaging` - Typed inbound/outbound channel messages
//! - `conversation` - Pure per-turn planning

pub mod assessment;
pub mod conversation;
pub mod escalation;
pub mod foundation;
pub mod intent;
pub mod messaging;
pub mod session;
pub mod triage;
