//! Session store: repository access serialized per (user, platform).
//!
//! Every read-modify-write of a session happens while holding the key's
//! guard. The per-key lock is a fair `tokio::sync::Mutex`, so messages for
//! the same pair are processed in arrival order while different pairs run
//! concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::session::{Session, SessionKey};
use crate::ports::SessionRepository;

/// Exclusive access to one (user, platform) pair. Dropping it releases
/// the key.
pub struct SessionGuard {
    key: SessionKey,
    _permit: OwnedMutexGuard<()>,
}

impl SessionGuard {
    pub fn key(&self) -> &SessionKey {
        &self.key
    }
}

pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
    locks: Mutex<HashMap<SessionKey, Arc<AsyncMutex<()>>>>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Waits for exclusive access to `key`.
    pub async fn lock(&self, key: SessionKey) -> SessionGuard {
        let mutex = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            Arc::clone(locks.entry(key.clone()).or_default())
        };
        let permit = mutex.lock_owned().await;
        SessionGuard {
            key,
            _permit: permit,
        }
    }

    pub async fn load(&self, guard: &SessionGuard) -> Result<Option<Session>, DomainError> {
        self.repository
            .load(&guard.key.user_id, guard.key.platform)
            .await
    }

    /// # Errors
    ///
    /// - `InternalError` if `session` belongs to a different key than `guard`
    /// - `DatabaseError` from the repository
    pub async fn save(&self, guard: &SessionGuard, session: &Session) -> Result<(), DomainError> {
        if session.key() != guard.key {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Session {} saved under foreign key {}", session.id(), guard.key),
            ));
        }
        self.repository.save(session).await
    }

    /// Waiting sessions idle since before `threshold`. Callers must re-check
    /// each one under its lock.
    pub async fn list_expired(&self, threshold: Timestamp) -> Result<Vec<Session>, DomainError> {
        self.repository.list_expired(threshold).await
    }

    /// Drops lock entries nobody holds or waits on. Returns how many were
    /// removed.
    pub fn prune_idle_locks(&self) -> usize {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = locks.len();
        locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        before - locks.len()
    }

    pub fn lock_count(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
