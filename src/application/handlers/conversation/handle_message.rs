//! HandleMessageHandler - the conversation orchestrator.
//!
//! Runs one inbound message through a session:
//!
//! 1. Lock the (user, platform) key; load or open the session
//! 2. Plan the turn (classification, assessment, escalation) on a blocking
//!    thread under the turn timeout
//! 3. Perform effects: medical record, reply generation, dispatch
//! 4. Persist, emit analytics, push to the channel
//!
//! Every path produces an outbound message.

use std::sync::Arc;
use std::time::Duration;

use tokio::task;
use tokio::time::timeout;

use crate::application::delivery::OutboundDispatcher;
use crate::application::session_store::{SessionGuard, SessionStore};
use crate::domain::assessment::AssessmentResult;
use crate::domain::conversation::{ConversationPlanner, PlannedAction, TurnPlan};
use crate::domain::escalation::{messages, EscalationDecision};
use crate::domain::foundation::{
    DomainError, EventEnvelope, EventId, SerializableDomainEvent, SessionId, SessionStatus,
    Timestamp,
};
use crate::domain::intent::Intent;
use crate::domain::messaging::{apology, quick_replies, Button, InboundMessage, OutboundMessage};
use crate::domain::session::{
    AssessmentCompleted, CloseReason, Session, SessionClosed, SessionEscalated, SessionKey,
    SessionStarted, TurnProcessed,
};
use crate::ports::{
    AnalyticsSink, HealthWorkerDispatch, MedicalRecordSink, ReplyGenerator, ReplyRequest, Worker,
};

/// Command to process one validated inbound message.
#[derive(Debug, Clone)]
pub struct HandleMessageCommand {
    pub message: InboundMessage,
}

/// Outcome of a turn. Always carries a reply.
#[derive(Debug, Clone)]
pub struct HandleMessageResult {
    pub outbound: OutboundMessage,
    pub session_id: SessionId,
    pub status: SessionStatus,
    /// Set when the session could not be loaded or saved. The reply is
    /// still valid; the caller should ask the channel to retry.
    pub persistence_error: Option<DomainError>,
}

#[derive(Debug, Clone)]
pub struct HandleMessageConfig {
    /// Budget for classification and assessment planning.
    pub turn_timeout: Duration,
    /// Budget for reply generation and for health worker dispatch.
    pub reply_timeout: Duration,
    pub emergency_hotline: String,
}

impl Default for HandleMessageConfig {
    fn default() -> Self {
        Self {
            turn_timeout: Duration::from_secs(5),
            reply_timeout: Duration::from_secs(8),
            emergency_hotline: "108".to_string(),
        }
    }
}

impl HandleMessageConfig {
    pub fn with_turn_timeout(mut self, turn_timeout: Duration) -> Self {
        self.turn_timeout = turn_timeout;
        self
    }

    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    pub fn with_emergency_hotline(mut self, hotline: impl Into<String>) -> Self {
        self.emergency_hotline = hotline.into();
        self
    }
}

/// Reply text and buttons before escalation is applied.
struct Reply {
    text: String,
    buttons: Vec<Button>,
}

/// Per-turn analytics context.
struct TurnMeta {
    correlation_id: String,
}

pub struct HandleMessageHandler {
    store: Arc<SessionStore>,
    planner: Arc<ConversationPlanner>,
    reply_generator: Arc<dyn ReplyGenerator>,
    medical_records: Arc<dyn MedicalRecordSink>,
    dispatch: Arc<dyn HealthWorkerDispatch>,
    analytics: Arc<dyn AnalyticsSink>,
    delivery: Option<Arc<OutboundDispatcher>>,
    config: HandleMessageConfig,
}

impl HandleMessageHandler {
    pub fn new(
        store: Arc<SessionStore>,
        planner: Arc<ConversationPlanner>,
        reply_generator: Arc<dyn ReplyGenerator>,
        medical_records: Arc<dyn MedicalRecordSink>,
        dispatch: Arc<dyn HealthWorkerDispatch>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            store,
            planner,
            reply_generator,
            medical_records,
            dispatch,
            analytics,
            delivery: None,
            config: HandleMessageConfig::default(),
        }
    }

    pub fn with_config(mut self, config: HandleMessageConfig) -> Self {
        self.config = config;
        self
    }

    /// Push replies for platforms without a synchronous response path.
    pub fn with_delivery(mut self, delivery: Arc<OutboundDispatcher>) -> Self {
        self.delivery = Some(delivery);
        self
    }

    pub async fn handle(&self, cmd: HandleMessageCommand) -> HandleMessageResult {
        let message = cmd.message;
        let meta = TurnMeta {
            correlation_id: EventId::new().to_string(),
        };
        let guard = self
            .store
            .lock(SessionKey::new(message.user_id.clone(), message.platform))
            .await;
        // Read under the guard so queued turns keep history in order.
        let now = Timestamp::now();

        let (mut session, mut persistence_error) =
            self.open_session(&guard, &message, now, &meta).await;

        if let Err(err) = session.begin_turn(
            &message.text,
            message.language.clone(),
            message.location.clone(),
            now,
        ) {
            tracing::error!(session_id = %session.id(), error = %err, "Opened session rejected input");
            return self.finish_with_apology(session, &message, persistence_error);
        }

        let plan = self.plan_turn(&session, &message, now).await;

        let (reply, escalated) = match plan {
            Some(plan) => self.apply_plan(&mut session, plan, &message, now, &meta).await,
            None => {
                let mut context = session.context().clone();
                context.clear_assessment();
                session.apply_context(context);
                session.record_reply(apology(&message.language), now);
                if let Err(err) = session.await_input() {
                    tracing::error!(session_id = %session.id(), error = %err, "Failed to end turn");
                }
                (
                    Reply {
                        text: apology(&message.language).to_string(),
                        buttons: Vec::new(),
                    },
                    false,
                )
            }
        };

        if let Err(err) = self.store.save(&guard, &session).await {
            tracing::error!(
                session_id = %session.id(),
                platform = %session.platform(),
                error = %err,
                "Failed to persist session, returning reply anyway"
            );
            persistence_error = Some(err);
        }
        drop(guard);

        let outbound = OutboundMessage {
            session_id: *session.id(),
            user_id: session.user_id().clone(),
            platform: session.platform(),
            language: message.language.clone(),
            text: reply.text,
            buttons: reply.buttons,
            escalated,
        };

        if session.platform().requires_push() {
            if let Some(delivery) = &self.delivery {
                delivery.dispatch(outbound.clone());
            }
        }

        HandleMessageResult {
            outbound,
            session_id: *session.id(),
            status: session.status(),
            persistence_error,
        }
    }

    /// Loads the pair's session, replacing terminal or stale escalated ones.
    async fn open_session(
        &self,
        guard: &SessionGuard,
        message: &InboundMessage,
        now: Timestamp,
        meta: &TurnMeta,
    ) -> (Session, Option<DomainError>) {
        let existing = match self.store.load(guard).await {
            Ok(existing) => existing,
            Err(err) => {
                tracing::error!(
                    key = %guard.key(),
                    error = %err,
                    "Failed to load session, starting a new one"
                );
                return (self.start_session(message, now, meta), Some(err));
            }
        };

        match existing {
            Some(session) if session.accepts_input() => (session, None),
            Some(mut stale) if stale.status() == SessionStatus::Escalated => {
                tracing::warn!(session_id = %stale.id(), "Closing stale escalated session");
                let mut error = None;
                if stale.close(now).is_ok() {
                    if let Err(err) = self.store.save(guard, &stale).await {
                        error = Some(err);
                    }
                    self.emit_closed(&stale, CloseReason::Superseded, now, meta);
                }
                (self.start_session(message, now, meta), error)
            }
            _ => (self.start_session(message, now, meta), None),
        }
    }

    fn start_session(&self, message: &InboundMessage, now: Timestamp, meta: &TurnMeta) -> Session {
        let session = Session::start(
            message.user_id.clone(),
            message.platform,
            message.language.clone(),
            message.location.clone(),
            now,
        );
        tracing::info!(
            session_id = %session.id(),
            platform = %message.platform,
            language = %message.language,
            "Session started"
        );
        self.emit(
            SessionStarted {
                event_id: EventId::new(),
                session_id: *session.id(),
                user_id: message.user_id.clone(),
                platform: message.platform,
                language: message.language.to_string(),
                started_at: now,
            }
            .to_envelope(),
            &session,
            meta,
        );
        session
    }

    /// Runs the planner off the async workers. `None` when the turn cannot
    /// be planned (timeout, panic, protocol violation).
    async fn plan_turn(
        &self,
        session: &Session,
        message: &InboundMessage,
        now: Timestamp,
    ) -> Option<TurnPlan> {
        let planner = Arc::clone(&self.planner);
        let context = session.context().clone();
        let text = message.text.clone();
        let language = message.language.clone();

        let planned = timeout(
            self.config.turn_timeout,
            task::spawn_blocking(move || planner.plan(context, &text, &language, now)),
        )
        .await;

        match planned {
            Ok(Ok(Ok(plan))) => Some(plan),
            Ok(Ok(Err(err))) => {
                debug_assert!(false, "assessment protocol violation: {}", err);
                tracing::error!(
                    session_id = %session.id(),
                    error = %err,
                    "Assessment protocol violation, clearing assessment"
                );
                None
            }
            Ok(Err(join_err)) => {
                tracing::error!(session_id = %session.id(), error = %join_err, "Planner task failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    session_id = %session.id(),
                    timeout_ms = self.config.turn_timeout.as_millis() as u64,
                    "Turn planning timed out"
                );
                None
            }
        }
    }

    /// Performs the plan's effects and moves the session to its next status.
    async fn apply_plan(
        &self,
        session: &mut Session,
        plan: TurnPlan,
        message: &InboundMessage,
        now: Timestamp,
        meta: &TurnMeta,
    ) -> (Reply, bool) {
        let intent = plan.classification.as_ref().map(|c| c.intent);
        let confidence = plan.classification.as_ref().map(|c| c.confidence);
        session.apply_context(plan.context);

        let mut assessment_step = None;
        let mut reply = match plan.action {
            PlannedAction::Question { text, step_index } => {
                assessment_step = Some(step_index);
                Reply {
                    text,
                    buttons: Vec::new(),
                }
            }
            PlannedAction::AssessmentComplete(result) => {
                self.record_assessment(session, &result, now, meta).await;
                Reply {
                    text: result.summary_text,
                    buttons: Vec::new(),
                }
            }
            PlannedAction::Reply { intent, entities } => {
                let request = ReplyRequest {
                    intent,
                    entities,
                    language: message.language.clone(),
                    user_text: message.text.clone(),
                };
                Reply {
                    text: self.generate_reply(session, &request).await,
                    buttons: quick_replies(intent, &message.language, session.platform()),
                }
            }
        };

        let escalated = match plan.escalation {
            Some(decision) => {
                reply = self.escalate(session, decision, now, meta).await;
                true
            }
            None => {
                session.record_reply(&reply.text, now);
                if intent == Some(Intent::Goodbye) {
                    if let Err(err) = session.close(now) {
                        tracing::error!(session_id = %session.id(), error = %err, "Failed to close session");
                    } else {
                        self.emit_closed(session, CloseReason::UserEnded, now, meta);
                    }
                } else if let Err(err) = session.await_input() {
                    tracing::error!(session_id = %session.id(), error = %err, "Failed to end turn");
                }
                false
            }
        };

        tracing::info!(
            session_id = %session.id(),
            platform = %session.platform(),
            intent = ?intent,
            assessment_step = ?assessment_step,
            escalated,
            status = %session.status(),
            "Turn processed"
        );
        self.emit(
            TurnProcessed {
                event_id: EventId::new(),
                session_id: *session.id(),
                platform: session.platform(),
                intent,
                confidence,
                user_state: session.context().user_state(),
                assessment_step,
                escalated,
                processed_at: now,
            }
            .to_envelope(),
            session,
            meta,
        );

        (reply, escalated)
    }

    async fn record_assessment(
        &self,
        session: &mut Session,
        result: &AssessmentResult,
        now: Timestamp,
        meta: &TurnMeta,
    ) {
        if let Err(err) = self
            .medical_records
            .write_assessment_result(session.user_id(), result)
            .await
        {
            tracing::error!(
                session_id = %session.id(),
                error = %err,
                "Failed to write medical record"
            );
        }
        session.mark_completion_pending(now);
        self.emit(
            AssessmentCompleted {
                event_id: EventId::new(),
                session_id: *session.id(),
                symptom: result.symptom.clone(),
                severity: result.severity,
                recommended_action: result.recommended_action,
                completed_at: now,
            }
            .to_envelope(),
            session,
            meta,
        );
    }

    async fn generate_reply(&self, session: &Session, request: &ReplyRequest) -> String {
        match timeout(self.config.reply_timeout, self.reply_generator.generate(request)).await {
            Ok(Ok(text)) => text,
            Ok(Err(err)) => {
                tracing::warn!(
                    session_id = %session.id(),
                    intent = %request.intent,
                    error = %err,
                    "Reply generation failed"
                );
                apology(&request.language).to_string()
            }
            Err(_) => {
                tracing::warn!(
                    session_id = %session.id(),
                    intent = %request.intent,
                    "Reply generation timed out"
                );
                apology(&request.language).to_string()
            }
        }
    }

    /// Hands the session to a health worker, or to the hotline when none
    /// can be reached. Either way the session ends completed.
    async fn escalate(
        &self,
        session: &mut Session,
        decision: EscalationDecision,
        now: Timestamp,
        meta: &TurnMeta,
    ) -> Reply {
        let language = session.language().clone();
        let hotline = self.config.emergency_hotline.as_str();

        if let Err(err) = session.escalate(decision, now) {
            tracing::error!(session_id = %session.id(), error = %err, "Failed to escalate session");
        }

        let assigned = self.assign_worker(session, decision).await;
        let text = match &assigned {
            Some(worker) => {
                messages::worker_assigned(&language, &worker.name, decision.priority, hotline)
            }
            None => messages::hotline_fallback(&language, hotline),
        };
        let worker_id = assigned.map(|w| w.id);
        session.record_dispatch(worker_id.clone());
        session.record_reply(&text, now);

        tracing::warn!(
            session_id = %session.id(),
            reason = decision.reason.as_str(),
            priority = decision.priority.as_str(),
            worker_id = ?worker_id.as_ref().map(|w| w.as_str()),
            "Session escalated"
        );
        self.emit(
            SessionEscalated {
                event_id: EventId::new(),
                session_id: *session.id(),
                reason: decision.reason,
                priority: decision.priority,
                fallback: worker_id.is_none(),
                assigned_worker: worker_id,
                escalated_at: now,
            }
            .to_envelope(),
            session,
            meta,
        );

        match session.close(now) {
            Ok(()) => self.emit_closed(session, CloseReason::EscalationHandled, now, meta),
            Err(err) => {
                tracing::error!(session_id = %session.id(), error = %err, "Failed to close escalated session")
            }
        }

        Reply {
            text,
            buttons: Vec::new(),
        }
    }

    /// Finds and notifies a worker. Any failure or timeout yields `None`.
    async fn assign_worker(
        &self,
        session: &Session,
        decision: EscalationDecision,
    ) -> Option<Worker> {
        let budget = self.config.reply_timeout;
        let found = timeout(
            budget,
            self.dispatch
                .find_available(session.location(), decision.priority),
        )
        .await;

        let worker = match found {
            Ok(Ok(Some(worker))) => worker,
            Ok(Ok(None)) => {
                tracing::info!(session_id = %session.id(), "No health worker available");
                return None;
            }
            Ok(Err(err)) => {
                tracing::warn!(session_id = %session.id(), error = %err, "Dispatch lookup failed");
                return None;
            }
            Err(_) => {
                tracing::warn!(session_id = %session.id(), "Dispatch lookup timed out");
                return None;
            }
        };

        let notified = timeout(
            budget,
            self.dispatch
                .notify(&worker.id, session.id(), decision.reason, decision.priority),
        )
        .await;

        match notified {
            Ok(Ok(())) => Some(worker),
            Ok(Err(err)) => {
                tracing::warn!(
                    session_id = %session.id(),
                    worker_id = %worker.id,
                    error = %err,
                    "Worker notification failed"
                );
                None
            }
            Err(_) => {
                tracing::warn!(session_id = %session.id(), worker_id = %worker.id, "Worker notification timed out");
                None
            }
        }
    }

    fn finish_with_apology(
        &self,
        session: Session,
        message: &InboundMessage,
        persistence_error: Option<DomainError>,
    ) -> HandleMessageResult {
        HandleMessageResult {
            outbound: OutboundMessage {
                session_id: *session.id(),
                user_id: session.user_id().clone(),
                platform: session.platform(),
                language: message.language.clone(),
                text: apology(&message.language).to_string(),
                buttons: Vec::new(),
                escalated: false,
            },
            session_id: *session.id(),
            status: session.status(),
            persistence_error,
        }
    }

    fn emit_closed(&self, session: &Session, reason: CloseReason, now: Timestamp, meta: &TurnMeta) {
        self.emit(
            SessionClosed {
                event_id: EventId::new(),
                session_id: *session.id(),
                status: session.status(),
                reason,
                turns: session.history().len(),
                closed_at: now,
            }
            .to_envelope(),
            session,
            meta,
        );
    }

    fn emit(&self, envelope: EventEnvelope, session: &Session, meta: &TurnMeta) {
        self.analytics.emit(
            envelope
                .with_correlation_id(meta.correlation_id.clone())
                .with_user_id(session.user_id().to_string())
                .with_platform(session.platform().as_str()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::channels::LoggingChannelAdapter;
    use crate::adapters::dispatch::WorkerRoster;
    use crate::adapters::records::InMemoryMedicalRecords;
    use crate::adapters::reply::TemplateReplyGenerator;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::application::delivery::DeliveryConfig;
    use crate::domain::assessment::FixedPhraseSelector;
    use crate::domain::escalation::{EscalationReason, Priority};
    use crate::domain::foundation::{ErrorCode, Language, Platform, UserId, WorkerId};
    use crate::domain::triage::TriageRuleTable;
    use crate::ports::{ReplyError, SessionRepository};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ─────────────────────────────────────────────────────────────────────
    // Mocks
    // ─────────────────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingAnalytics {
        events: Mutex<Vec<EventEnvelope>>,
    }

    impl RecordingAnalytics {
        fn event_types(&self) -> Vec<String> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type.clone())
                .collect()
        }

        fn payloads_of(&self, event_type: &str) -> Vec<serde_json::Value> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.event_type == event_type)
                .map(|e| e.payload.clone())
                .collect()
        }
    }

    impl AnalyticsSink for RecordingAnalytics {
        fn emit(&self, event: EventEnvelope) {
            self.events.lock().unwrap().push(event);
        }
    }

    struct FailingReplyGenerator;

    #[async_trait]
    impl ReplyGenerator for FailingReplyGenerator {
        async fn generate(&self, _request: &ReplyRequest) -> Result<String, ReplyError> {
            Err(ReplyError::Unavailable("down".into()))
        }
    }

    struct SlowReplyGenerator;

    #[async_trait]
    impl ReplyGenerator for SlowReplyGenerator {
        async fn generate(&self, _request: &ReplyRequest) -> Result<String, ReplyError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".into())
        }
    }

    struct FailingSaveRepository {
        inner: InMemorySessionRepository,
    }

    #[async_trait]
    impl SessionRepository for FailingSaveRepository {
        async fn load(
            &self,
            user_id: &UserId,
            platform: Platform,
        ) -> Result<Option<Session>, DomainError> {
            self.inner.load(user_id, platform).await
        }

        async fn save(&self, _session: &Session) -> Result<(), DomainError> {
            Err(DomainError::database("disk full"))
        }

        async fn list_expired(&self, threshold: Timestamp) -> Result<Vec<Session>, DomainError> {
            self.inner.list_expired(threshold).await
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Fixture
    // ─────────────────────────────────────────────────────────────────────

    struct Fixture {
        repository: Arc<InMemorySessionRepository>,
        records: Arc<InMemoryMedicalRecords>,
        roster: Arc<WorkerRoster>,
        analytics: Arc<RecordingAnalytics>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                repository: Arc::new(InMemorySessionRepository::new()),
                records: Arc::new(InMemoryMedicalRecords::new()),
                roster: Arc::new(WorkerRoster::empty()),
                analytics: Arc::new(RecordingAnalytics::default()),
            }
        }

        fn with_roster(mut self, roster: WorkerRoster) -> Self {
            self.roster = Arc::new(roster);
            self
        }

        fn handler_with(
            &self,
            repository: Arc<dyn SessionRepository>,
            reply: Arc<dyn ReplyGenerator>,
        ) -> HandleMessageHandler {
            HandleMessageHandler::new(
                Arc::new(SessionStore::new(repository)),
                Arc::new(ConversationPlanner::new(
                    Arc::new(TriageRuleTable::standard()),
                    Arc::new(FixedPhraseSelector(0)),
                )),
                reply,
                self.records.clone(),
                self.roster.clone(),
                self.analytics.clone(),
            )
        }

        fn handler(&self) -> HandleMessageHandler {
            self.handler_with(
                self.repository.clone(),
                Arc::new(TemplateReplyGenerator::new()),
            )
        }
    }

    fn command(platform: Platform, text: &str) -> HandleMessageCommand {
        HandleMessageCommand {
            message: InboundMessage::parse("user-1", platform.as_str(), text, Some("en"), None)
                .unwrap(),
        }
    }

    async fn say(handler: &HandleMessageHandler, text: &str) -> HandleMessageResult {
        handler.handle(command(Platform::Web, text)).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn greeting_opens_session_and_offers_buttons_on_web() {
        let fixture = Fixture::new();
        let result = say(&fixture.handler(), "hi").await;

        assert_eq!(result.outbound.text, "Hi, how are you? How can I help you today?");
        assert_eq!(result.outbound.buttons.len(), 3);
        assert_eq!(result.status, SessionStatus::Waiting);
        assert!(result.persistence_error.is_none());
        assert_eq!(
            fixture.analytics.event_types(),
            vec!["triage.session_started.v1", "triage.turn_processed.v1"]
        );
    }

    #[tokio::test]
    async fn second_message_continues_the_same_session() {
        let fixture = Fixture::new();
        let handler = fixture.handler();
        let first = say(&handler, "hi").await;
        let second = say(&handler, "I have fever").await;

        assert_eq!(first.session_id, second.session_id);
        assert_eq!(second.outbound.text, "What is your current body temperature?");
        assert!(second.outbound.buttons.is_empty());
    }

    #[tokio::test]
    async fn reply_generator_failure_yields_apology() {
        let fixture = Fixture::new();
        let handler =
            fixture.handler_with(fixture.repository.clone(), Arc::new(FailingReplyGenerator));

        let result = say(&handler, "hello").await;
        assert_eq!(result.outbound.text, apology(&Language::english()));
        assert_eq!(result.status, SessionStatus::Waiting);
    }

    #[tokio::test]
    async fn slow_reply_generator_times_out_to_apology() {
        let fixture = Fixture::new();
        let handler = fixture
            .handler_with(fixture.repository.clone(), Arc::new(SlowReplyGenerator))
            .with_config(
                HandleMessageConfig::default().with_reply_timeout(Duration::from_millis(20)),
            );

        let result = say(&handler, "hello").await;
        assert_eq!(result.outbound.text, apology(&Language::english()));
    }

    #[tokio::test]
    async fn save_failure_still_returns_reply() {
        let fixture = Fixture::new();
        let repository = Arc::new(FailingSaveRepository {
            inner: InMemorySessionRepository::new(),
        });
        let handler =
            fixture.handler_with(repository, Arc::new(TemplateReplyGenerator::new()));

        let result = say(&handler, "hi").await;
        assert_eq!(result.outbound.text, "Hi, how are you? How can I help you today?");
        let err = result.persistence_error.unwrap();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn severe_assessment_is_written_and_escalated_to_worker() {
        let fixture = Fixture::new().with_roster(WorkerRoster::new(vec![Worker {
            id: WorkerId::new("asha-1").unwrap(),
            name: "Sunita".into(),
            location: None,
            phone: None,
        }]));
        let handler = fixture.handler();

        say(&handler, "I have a cough").await;
        for answer in ["normal", "two days", "none", "no", "no"] {
            say(&handler, answer).await;
        }
        let records = fixture
            .records
            .records_for(&UserId::new("user-1").unwrap())
            .await;
        assert_eq!(records.len(), 1);

        say(&handler, "I have fever").await;
        let mut last = None;
        for answer in ["very high, 104", "3 days", "none", "no", "no"] {
            last = Some(say(&handler, answer).await);
        }
        let last = last.unwrap();
        assert!(last.outbound.escalated);
        assert!(last.outbound.text.contains("Sunita"));
        assert!(last.outbound.text.contains("108"));
        assert_eq!(last.status, SessionStatus::Completed);

        let escalations = fixture.analytics.payloads_of("triage.session_escalated.v1");
        assert_eq!(escalations.len(), 1);
        assert_eq!(escalations[0]["reason"], EscalationReason::CriticalSeverityAssessment.as_str());
        assert_eq!(escalations[0]["priority"], Priority::High.as_str());
        assert_eq!(escalations[0]["fallback"], false);
        assert!(fixture.roster.is_busy(&WorkerId::new("asha-1").unwrap()).await);
        assert_eq!(
            fixture
                .records
                .records_for(&UserId::new("user-1").unwrap())
                .await
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn emergency_without_worker_falls_back_to_hotline() {
        let fixture = Fixture::new();
        let handler = fixture.handler().with_config(
            HandleMessageConfig::default().with_emergency_hotline("112"),
        );

        let result = say(&handler, "my father is unconscious").await;

        assert!(result.outbound.escalated);
        assert!(result.outbound.text.contains("112"));
        assert!(result.outbound.buttons.is_empty());
        assert_eq!(result.status, SessionStatus::Completed);

        let stored = fixture
            .repository
            .load(&UserId::new("user-1").unwrap(), Platform::Web)
            .await
            .unwrap()
            .unwrap();
        let record = stored.escalation().unwrap();
        assert!(record.fallback);
        assert!(record.assigned_worker.is_none());
    }

    #[tokio::test]
    async fn next_message_after_escalation_opens_new_session() {
        let fixture = Fixture::new();
        let handler = fixture.handler();

        let escalated = say(&handler, "emergency").await;
        let next = say(&handler, "hi").await;

        assert_ne!(escalated.session_id, next.session_id);
        assert_eq!(next.status, SessionStatus::Waiting);
    }

    #[tokio::test]
    async fn stale_escalated_session_is_superseded() {
        let fixture = Fixture::new();
        let now = Timestamp::now();
        let mut stale = Session::start(
            UserId::new("user-1").unwrap(),
            Platform::Web,
            Language::english(),
            None,
            now,
        );
        stale.begin_turn("help", Language::english(), None, now).unwrap();
        stale
            .escalate(
                EscalationDecision::new(EscalationReason::UserRequestedHuman, Priority::Medium),
                now,
            )
            .unwrap();
        fixture.repository.save(&stale).await.unwrap();

        let result = say(&fixture.handler(), "hi").await;

        assert_ne!(result.session_id, *stale.id());
        let closed = fixture.analytics.payloads_of("triage.session_closed.v1");
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0]["reason"], "superseded");
    }

    #[tokio::test]
    async fn goodbye_completes_the_session() {
        let fixture = Fixture::new();
        let handler = fixture.handler();
        say(&handler, "hi").await;

        let result = say(&handler, "bye").await;

        assert_eq!(result.status, SessionStatus::Completed);
        assert!(result.outbound.text.starts_with("Take care"));
        let closed = fixture.analytics.payloads_of("triage.session_closed.v1");
        assert_eq!(closed[0]["reason"], "user_ended");
    }

    #[tokio::test]
    async fn push_platforms_get_outbound_delivery() {
        let fixture = Fixture::new();
        let adapter = Arc::new(LoggingChannelAdapter::new(Platform::Sms));
        let delivery = Arc::new(
            OutboundDispatcher::new(DeliveryConfig::default()).with_adapter(adapter.clone()),
        );
        let handler = fixture.handler().with_delivery(delivery);

        let result = handler.handle(command(Platform::Sms, "hi")).await;
        assert!(result.outbound.buttons.is_empty());

        for _ in 0..50 {
            if !adapter.sent_messages().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let sent = adapter.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, result.outbound.text);
    }
}
