//! SessionStatus enum for tracking the lifecycle of triage conversations.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a triage session.
///
/// ```text
/// Active ──► Waiting ──► TimedOut
///   │  ▲        │
///   │  └────────┤
///   ▼           ▼
/// Escalated ──► Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// A turn is being processed.
    #[default]
    Active,
    /// Waiting for the user's next message.
    Waiting,
    /// Handed over to a health worker (or the hotline fallback).
    Escalated,
    /// Closed normally.
    Completed,
    /// Closed by the inactivity sweep.
    TimedOut,
}

impl SessionStatus {
    /// Returns true if an inbound message may continue this session.
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionStatus::Active | SessionStatus::Waiting)
    }

    /// Stable lowercase name used on the wire and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Waiting => "waiting",
            SessionStatus::Escalated => "escalated",
            SessionStatus::Completed => "completed",
            SessionStatus::TimedOut => "timed_out",
        }
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Active, Waiting)
                | (Active, Escalated)
                | (Active, Completed)
                | (Waiting, Active)
                | (Waiting, Escalated)
                | (Waiting, Completed)
                | (Waiting, TimedOut)
                | (Escalated, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Active => vec![Waiting, Escalated, Completed],
            Waiting => vec![Active, Escalated, Completed, TimedOut],
            Escalated => vec![Completed],
            Completed | TimedOut => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
