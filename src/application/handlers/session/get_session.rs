//! GetSessionHandler - Query handler for a user's session on a channel.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Platform, UserId};
use crate::domain::session::Session;
use crate::ports::SessionRepository;

/// Query for the session of a (user, platform) pair.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub user_id: UserId,
    pub platform: Platform,
}

pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Returns the latest session, terminal ones included.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the pair never had a session
    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, DomainError> {
        self.repository
            .load(&query.user_id, query.platform)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::SessionNotFound,
                    format!("No session for {} on {}", query.user_id, query.platform),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::domain::foundation::{Language, Timestamp};

    #[tokio::test]
    async fn returns_stored_session() {
        let repository = Arc::new(InMemorySessionRepository::new());
        let session = Session::start(
            UserId::new("u1").unwrap(),
            Platform::Whatsapp,
            Language::hindi(),
            Some("Rampur".into()),
            Timestamp::now(),
        );
        repository.save(&session).await.unwrap();

        let found = GetSessionHandler::new(repository)
            .handle(GetSessionQuery {
                user_id: UserId::new("u1").unwrap(),
                platform: Platform::Whatsapp,
            })
            .await
            .unwrap();
        assert_eq!(found.id(), session.id());
        assert_eq!(found.location(), Some("Rampur"));
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let handler = GetSessionHandler::new(Arc::new(InMemorySessionRepository::new()));
        let err = handler
            .handle(GetSessionQuery {
                user_id: UserId::new("nobody").unwrap(),
                platform: Platform::Web,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }
}
