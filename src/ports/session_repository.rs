//! Session repository port.
//!
//! Defines the contract for persisting and retrieving Session aggregates,
//! keyed by (user, platform). Callers serialise access per key through the
//! application's session store; implementations need no locking of their
//! own beyond memory safety.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Platform, Timestamp, UserId};
use crate::domain::session::Session;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Latest session for the pair, whatever its status.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn load(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> Result<Option<Session>, DomainError>;

    /// Insert or replace the session for its (user, platform) pair.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Waiting sessions whose last activity is before `threshold`.
    async fn list_expired(&self, threshold: Timestamp) -> Result<Vec<Session>, DomainError>;
}
