//! Session aggregate entity.
//!
//! One session per (user, platform) pair holds the conversation context,
//! the append-only turn history and the lifecycle status.
//!
//! # Invariants
//!
//! - Status changes go through [`StateMachine`] validation
//! - `history` is append-only
//! - `ended_at` is set exactly when the status becomes terminal

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::escalation::{EscalationDecision, EscalationReason, Priority};
use crate::domain::foundation::{
    Language, Platform, SessionId, SessionStatus, StateMachine, Timestamp, UserId, WorkerId,
};

use super::{ConversationContext, SessionError};

/// Store key: a user on a specific channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: UserId,
    pub platform: Platform,
}

impl SessionKey {
    pub fn new(user_id: UserId, platform: Platform) -> Self {
        Self { user_id, platform }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: Timestamp,
}

/// How an escalation was handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRecord {
    pub reason: EscalationReason,
    pub priority: Priority,
    /// Worker who accepted the notification, if any.
    pub assigned_worker: Option<WorkerId>,
    /// True when the hotline fallback was sent instead of a worker.
    pub fallback: bool,
    pub escalated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    platform: Platform,
    language: Language,
    location: Option<String>,
    status: SessionStatus,
    context: ConversationContext,
    history: Vec<Turn>,
    started_at: Timestamp,
    last_activity_at: Timestamp,
    ended_at: Option<Timestamp>,
    escalation: Option<EscalationRecord>,
    /// Set when an assessment finished; the sweep completes the session
    /// after a cool-down unless the user writes again.
    completion_pending_since: Option<Timestamp>,
}

impl Session {
    /// Opens a fresh active session.
    pub fn start(
        user_id: UserId,
        platform: Platform,
        language: Language,
        location: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            platform,
            language,
            location,
            status: SessionStatus::Active,
            context: ConversationContext::new(),
            history: Vec::new(),
            started_at: now,
            last_activity_at: now,
            ended_at: None,
            escalation: None,
            completion_pending_since: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.user_id.clone(), self.platform)
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn last_activity_at(&self) -> &Timestamp {
        &self.last_activity_at
    }

    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    pub fn escalation(&self) -> Option<&EscalationRecord> {
        self.escalation.as_ref()
    }

    pub fn completion_pending_since(&self) -> Option<&Timestamp> {
        self.completion_pending_since.as_ref()
    }

    /// True when the next inbound message should continue this session.
    pub fn accepts_input(&self) -> bool {
        self.status.accepts_input()
    }

    /// Seconds since the last user or assistant activity.
    pub fn idle_secs(&self, now: &Timestamp) -> u64 {
        now.secs_since(&self.last_activity_at)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts processing a user message: resumes a waiting session and
    /// appends the user's turn.
    ///
    /// # Errors
    ///
    /// - `Closed` if the session no longer accepts input
    pub fn begin_turn(
        &mut self,
        text: &str,
        language: Language,
        location: Option<String>,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        if !self.accepts_input() {
            return Err(SessionError::Closed {
                id: self.id,
                status: self.status,
            });
        }
        if self.status == SessionStatus::Waiting {
            self.transition(SessionStatus::Active)?;
        }

        self.language = language;
        if location.is_some() {
            self.location = location;
        }
        self.completion_pending_since = None;
        self.push_turn(Role::User, text, now);
        Ok(())
    }

    /// Appends the assistant's reply.
    pub fn record_reply(&mut self, text: &str, now: Timestamp) {
        self.push_turn(Role::Assistant, text, now);
    }

    /// Replaces the context with the planner's updated copy.
    pub fn apply_context(&mut self, context: ConversationContext) {
        self.context = context;
    }

    /// Ends the turn; the session waits for the next message.
    pub fn await_input(&mut self) -> Result<(), SessionError> {
        self.transition(SessionStatus::Waiting)
    }

    /// Flags the session for completion after the cool-down.
    pub fn mark_completion_pending(&mut self, now: Timestamp) {
        self.completion_pending_since = Some(now);
    }

    /// Hands the session to a human.
    pub fn escalate(
        &mut self,
        decision: EscalationDecision,
        now: Timestamp,
    ) -> Result<(), SessionError> {
        self.transition(SessionStatus::Escalated)?;
        self.context.mark_escalated();
        self.escalation = Some(EscalationRecord {
            reason: decision.reason,
            priority: decision.priority,
            assigned_worker: None,
            fallback: false,
            escalated_at: now,
        });
        Ok(())
    }

    /// Records the dispatch outcome of the current escalation.
    pub fn record_dispatch(&mut self, worker: Option<WorkerId>) {
        if let Some(record) = self.escalation.as_mut() {
            record.fallback = worker.is_none();
            record.assigned_worker = worker;
        }
    }

    /// Closes the session as completed.
    pub fn close(&mut self, now: Timestamp) -> Result<(), SessionError> {
        self.transition(SessionStatus::Completed)?;
        self.completion_pending_since = None;
        self.ended_at = Some(now);
        Ok(())
    }

    /// Closes an idle waiting session. Only the sweep calls this.
    pub fn time_out(&mut self, now: Timestamp) -> Result<(), SessionError> {
        self.transition(SessionStatus::TimedOut)?;
        self.completion_pending_since = None;
        self.ended_at = Some(now);
        Ok(())
    }

    fn transition(&mut self, target: SessionStatus) -> Result<(), SessionError> {
        self.status = self.status.transition_to(target)?;
        Ok(())
    }

    fn push_turn(&mut self, role: Role, text: &str, now: Timestamp) {
        self.history.push(Turn {
            role,
            text: text.to_string(),
            at: now,
        });
        self.last_activity_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::UserState;

    fn session() -> Session {
        Session::start(
            UserId::new("+911234567890").unwrap(),
            Platform::Whatsapp,
            Language::english(),
            Some("Pune".into()),
            Timestamp::now(),
        )
    }

    #[test]
    fn start_opens_active_session() {
        let s = session();
        assert_eq!(s.status(), SessionStatus::Active);
        assert!(s.history().is_empty());
        assert_eq!(s.key().to_string(), "whatsapp:+911234567890");
        assert_eq!(s.location(), Some("Pune"));
    }

    #[test]
    fn turn_cycle_moves_between_active_and_waiting() {
        let mut s = session();
        let now = Timestamp::now();
        s.begin_turn("hi", Language::english(), None, now).unwrap();
        s.record_reply("hello", now);
        s.await_input().unwrap();
        assert_eq!(s.status(), SessionStatus::Waiting);

        s.begin_turn("again", Language::hindi(), None, now.plus_secs(5)).unwrap();
        assert_eq!(s.status(), SessionStatus::Active);
        assert_eq!(s.history().len(), 3);
        assert_eq!(s.language(), &Language::hindi());
        assert_eq!(s.last_activity_at(), &now.plus_secs(5));
        assert_eq!(s.location(), Some("Pune"));
    }

    #[test]
    fn new_input_clears_completion_marker() {
        let mut s = session();
        let now = Timestamp::now();
        s.begin_turn("x", Language::english(), None, now).unwrap();
        s.mark_completion_pending(now);
        s.await_input().unwrap();
        assert!(s.completion_pending_since().is_some());

        s.begin_turn("y", Language::english(), None, now).unwrap();
        assert!(s.completion_pending_since().is_none());
    }

    #[test]
    fn escalation_then_close() {
        let mut s = session();
        let now = Timestamp::now();
        s.begin_turn("help", Language::english(), None, now).unwrap();
        s.escalate(
            EscalationDecision::new(EscalationReason::ExplicitEmergencyKeyword, Priority::Urgent),
            now,
        )
        .unwrap();
        s.record_dispatch(None);

        assert_eq!(s.status(), SessionStatus::Escalated);
        assert_eq!(s.context().user_state(), UserState::Escalated);
        assert!(s.escalation().unwrap().fallback);

        s.close(now).unwrap();
        assert_eq!(s.status(), SessionStatus::Completed);
        assert_eq!(s.ended_at(), Some(&now));
    }

    #[test]
    fn record_dispatch_with_worker_clears_fallback() {
        let mut s = session();
        let now = Timestamp::now();
        s.escalate(
            EscalationDecision::new(EscalationReason::UserRequestedHuman, Priority::Medium),
            now,
        )
        .unwrap();
        s.record_dispatch(Some(WorkerId::new("asha-1").unwrap()));
        let record = s.escalation().unwrap();
        assert!(!record.fallback);
        assert_eq!(record.assigned_worker.as_ref().unwrap().as_str(), "asha-1");
    }

    #[test]
    fn closed_session_rejects_input() {
        let mut s = session();
        s.close(Timestamp::now()).unwrap();
        match s.begin_turn("hi", Language::english(), None, Timestamp::now()) {
            Err(SessionError::Closed { status, .. }) => assert_eq!(status, SessionStatus::Completed),
            other => panic!("Expected Closed, got {:?}", other),
        }
    }

    #[test]
    fn only_waiting_sessions_time_out() {
        let mut s = session();
        assert!(s.time_out(Timestamp::now()).is_err());
        s.await_input().unwrap();
        s.time_out(Timestamp::now()).unwrap();
        assert_eq!(s.status(), SessionStatus::TimedOut);
        assert!(s.ended_at().is_some());
    }

    #[test]
    fn idle_secs_counts_from_last_activity() {
        let mut s = session();
        let now = Timestamp::now();
        s.begin_turn("x", Language::english(), None, now).unwrap();
        assert_eq!(s.idle_secs(&now.plus_secs(700)), 700);
    }
}
