//! Session domain module.
//!
//! One conversation per (user, platform) pair: lifecycle status, context,
//! turn history and escalation record.
//!
//! # Events
//!
//! - `SessionStarted`, `TurnProcessed`, `AssessmentCompleted`,
//!   `SessionEscalated`, `SessionClosed`

mod aggregate;
mod context;
mod errors;
mod events;

pub use aggregate::{EscalationRecord, Role, Session, SessionKey, Turn};
pub use context::{ConversationContext, QueryRecord, UserState, MAX_PREVIOUS_QUERIES};
pub use errors::SessionError;
pub use events::{
    AssessmentCompleted, CloseReason, SessionClosed, SessionEscalated, SessionStarted,
    TurnProcessed,
};
