//! In-Memory Session Repository Adapter
//!
//! Keeps one session per (user, platform) pair in memory. Suitable for a
//! single-process deployment and for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Platform, SessionStatus, Timestamp, UserId};
use crate::domain::session::{Session, SessionKey};
use crate::ports::SessionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionKey, Session>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, any status.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Clear all stored sessions (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> Result<Option<Session>, DomainError> {
        let key = SessionKey::new(user_id.clone(), platform);
        Ok(self.sessions.read().await.get(&key).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .insert(session.key(), session.clone());
        Ok(())
    }

    async fn list_expired(&self, threshold: Timestamp) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| {
                s.status() == SessionStatus::Waiting && s.last_activity_at().is_before(&threshold)
            })
            .cloned()
            .collect())
    }
}
