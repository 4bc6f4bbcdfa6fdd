//! SessionSweeper - Background service closing idle sessions.
//!
//! Each pass lists waiting sessions idle for at least the shorter of the
//! two timeouts and re-checks every one under its key lock:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | assessment finished `completion_cooldown` ago | `Completed` |
//! | no activity for `inactivity_timeout` | `TimedOut` |
//!
//! A message arriving between listing and locking wins: the re-check sees
//! the fresh activity and leaves the session alone.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::session_store::SessionStore;
use crate::domain::foundation::{
    DomainError, EventId, SerializableDomainEvent, SessionStatus, Timestamp,
};
use crate::domain::session::{CloseReason, Session, SessionClosed};
use crate::ports::AnalyticsSink;

#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub interval: Duration,
    pub inactivity_timeout: Duration,
    pub completion_cooldown: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            inactivity_timeout: Duration::from_secs(600),
            completion_cooldown: Duration::from_secs(120),
        }
    }
}

impl SweepConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    pub fn with_completion_cooldown(mut self, cooldown: Duration) -> Self {
        self.completion_cooldown = cooldown;
        self
    }
}

/// Counts from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub completed: usize,
    pub timed_out: usize,
    pub failed: usize,
    pub pruned_locks: usize,
}

pub struct SessionSweeper {
    store: Arc<SessionStore>,
    analytics: Arc<dyn AnalyticsSink>,
    config: SweepConfig,
}

impl SessionSweeper {
    pub fn new(store: Arc<SessionStore>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            store,
            analytics,
            config: SweepConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SweepConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the sweep loop until shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Session sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    match self.sweep_once(Timestamp::now()).await {
                        Ok(report) if report != SweepReport::default() => {
                            tracing::info!(
                                completed = report.completed,
                                timed_out = report.timed_out,
                                failed = report.failed,
                                pruned_locks = report.pruned_locks,
                                "Session sweep finished"
                            );
                        }
                        Ok(_) => {}
                        Err(err) => tracing::error!(error = %err, "Session sweep failed"),
                    }
                }
            }
        }
    }

    /// Run exactly one pass as of `now`.
    ///
    /// Only listing can fail the pass. A session that cannot be loaded,
    /// closed or saved is logged, counted in `failed` and skipped.
    pub async fn sweep_once(&self, now: Timestamp) -> Result<SweepReport, DomainError> {
        let inactivity = self.config.inactivity_timeout.as_secs();
        let cooldown = self.config.completion_cooldown.as_secs();
        let threshold = now.minus_secs(inactivity.min(cooldown));

        let mut report = SweepReport::default();
        for candidate in self.store.list_expired(threshold).await? {
            if let Err(err) = self.close_if_due(&candidate, now, &mut report).await {
                report.failed += 1;
                tracing::warn!(
                    session_id = %candidate.id(),
                    platform = %candidate.platform(),
                    error = %err,
                    "Sweep skipped session"
                );
            }
        }

        report.pruned_locks = self.store.prune_idle_locks();
        Ok(report)
    }

    async fn close_if_due(
        &self,
        candidate: &Session,
        now: Timestamp,
        report: &mut SweepReport,
    ) -> Result<(), DomainError> {
        let inactivity = self.config.inactivity_timeout.as_secs();
        let cooldown = self.config.completion_cooldown.as_secs();

        let guard = self.store.lock(candidate.key()).await;
        let Some(mut session) = self.store.load(&guard).await? else {
            return Ok(());
        };
        if session.status() != SessionStatus::Waiting {
            return Ok(());
        }

        let cooled_down = session
            .completion_pending_since()
            .is_some_and(|since| now.secs_since(since) >= cooldown);

        let reason = if cooled_down {
            session.close(now)?;
            CloseReason::AssessmentCooldown
        } else if session.idle_secs(&now) >= inactivity {
            session.time_out(now)?;
            CloseReason::Inactivity
        } else {
            return Ok(());
        };

        self.store.save(&guard, &session).await?;
        drop(guard);

        match reason {
            CloseReason::AssessmentCooldown => report.completed += 1,
            _ => report.timed_out += 1,
        }
        tracing::debug!(
            session_id = %session.id(),
            platform = %session.platform(),
            status = %session.status(),
            "Session closed by sweep"
        );
        self.emit_closed(&session, reason, now);
        Ok(())
    }

    fn emit_closed(&self, session: &Session, reason: CloseReason, now: Timestamp) {
        let envelope = SessionClosed {
            event_id: EventId::new(),
            session_id: *session.id(),
            status: session.status(),
            reason,
            turns: session.history().len(),
            closed_at: now,
        }
        .to_envelope()
        .with_user_id(session.user_id().to_string())
        .with_platform(session.platform().as_str());
        self.analytics.emit(envelope);
    }
}
