//! Health worker dispatch port.
//!
//! Finds an available community health worker near the user and notifies
//! them of an escalated session.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::escalation::{EscalationReason, Priority};
use crate::domain::foundation::{SessionId, WorkerId};

/// A health worker who can take over a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    /// Area the worker covers (village, ward, district).
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Dispatch failures. The orchestrator recovers from all of them with the
/// hotline fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Health worker {0} is no longer available")]
    WorkerUnavailable(WorkerId),

    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    #[error("Dispatch backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait HealthWorkerDispatch: Send + Sync {
    /// An available worker for `location` (any location when `None`).
    async fn find_available(
        &self,
        location: Option<&str>,
        urgency: Priority,
    ) -> Result<Option<Worker>, DispatchError>;

    /// Tell `worker_id` to contact the user of `session_id`.
    async fn notify(
        &self,
        worker_id: &WorkerId,
        session_id: &SessionId,
        reason: EscalationReason,
        urgency: Priority,
    ) -> Result<(), DispatchError>;

    /// Marks `worker_id` free again once they have closed the case.
    /// Returns `false` for unknown workers.
    async fn release(&self, worker_id: &WorkerId) -> Result<bool, DispatchError>;
}
