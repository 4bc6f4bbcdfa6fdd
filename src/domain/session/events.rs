//! Session analytics events.
//!
//! - `SessionStarted` - New session opened for a (user, platform) pair
//! - `TurnProcessed` - One inbound message handled
//! - `AssessmentCompleted` - Five-question protocol finished
//! - `SessionEscalated` - Conversation handed to a worker or the hotline
//! - `SessionClosed` - Session reached a terminal status

use serde::{Deserialize, Serialize};

use crate::domain::escalation::{EscalationReason, Priority};
use crate::domain::foundation::{
    domain_event, EventId, Platform, SessionId, SessionStatus, Timestamp, UserId, WorkerId,
};
use crate::domain::intent::Intent;
use crate::domain::triage::{RecommendedAction, Severity};

use super::UserState;

// ════════════════════════════════════════════════════════════════════════════
// SessionStarted
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub user_id: UserId,
    pub platform: Platform,
    pub language: String,
    pub started_at: Timestamp,
}

domain_event!(
    SessionStarted,
    event_type = "triage.session_started.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = started_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// TurnProcessed
// ════════════════════════════════════════════════════════════════════════════

/// Published once per inbound message, after the reply is decided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnProcessed {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub platform: Platform,
    /// `None` for assessment answers, which are not classified.
    pub intent: Option<Intent>,
    pub confidence: Option<f64>,
    pub user_state: UserState,
    pub assessment_step: Option<usize>,
    pub escalated: bool,
    pub processed_at: Timestamp,
}

domain_event!(
    TurnProcessed,
    event_type = "triage.turn_processed.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = processed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// AssessmentCompleted
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentCompleted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub symptom: String,
    pub severity: Severity,
    pub recommended_action: RecommendedAction,
    pub completed_at: Timestamp,
}

domain_event!(
    AssessmentCompleted,
    event_type = "triage.assessment_completed.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionEscalated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEscalated {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub reason: EscalationReason,
    pub priority: Priority,
    pub assigned_worker: Option<WorkerId>,
    pub fallback: bool,
    pub escalated_at: Timestamp,
}

domain_event!(
    SessionEscalated,
    event_type = "triage.session_escalated.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = escalated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionClosed
// ════════════════════════════════════════════════════════════════════════════

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    UserEnded,
    AssessmentCooldown,
    EscalationHandled,
    Inactivity,
    Superseded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClosed {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub status: SessionStatus,
    pub reason: CloseReason,
    pub turns: usize,
    pub closed_at: Timestamp,
}

domain_event!(
    SessionClosed,
    event_type = "triage.session_closed.v1",
    aggregate_id = session_id,
    aggregate_type = "Session",
    occurred_at = closed_at,
    event_id = event_id
);
