//! Health worker roster.
//!
//! In-memory dispatch backed by a fixed list of workers, optionally
//! loaded from a YAML file:
//!
//! ```yaml
//! workers:
//!   - id: asha-1
//!     name: Sunita Devi
//!     location: Rampur
//!     phone: "+919800000001"
//! ```
//!
//! A notified worker stays busy until released or until the assignment
//! outlives its TTL, whichever comes first.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::escalation::{EscalationReason, Priority};
use crate::domain::foundation::{SessionId, Timestamp, WorkerId};

/// How long a notified worker is held for one escalation.
pub const DEFAULT_ASSIGNMENT_TTL: Duration = Duration::from_secs(30 * 60);
use crate::ports::{DispatchError, HealthWorkerDispatch, Worker};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid roster file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    workers: Vec<Worker>,
}

#[derive(Debug, Clone)]
struct RosterEntry {
    worker: Worker,
    busy_until: Option<Timestamp>,
}

impl RosterEntry {
    fn is_busy_at(&self, now: &Timestamp) -> bool {
        self.busy_until.is_some_and(|until| now.is_before(&until))
    }
}

#[derive(Debug, Clone)]
pub struct WorkerRoster {
    entries: Arc<RwLock<Vec<RosterEntry>>>,
    assignment_ttl: Duration,
}

impl Default for WorkerRoster {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl WorkerRoster {
    pub fn new(workers: Vec<Worker>) -> Self {
        let entries = workers
            .into_iter()
            .map(|worker| RosterEntry {
                worker,
                busy_until: None,
            })
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
            assignment_ttl: DEFAULT_ASSIGNMENT_TTL,
        }
    }

    /// An empty roster; every escalation takes the hotline fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_assignment_ttl(mut self, ttl: Duration) -> Self {
        self.assignment_ttl = ttl;
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RosterError> {
        let file: RosterFile = serde_yaml::from_str(yaml)?;
        Ok(Self::new(file.workers))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub async fn worker_count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_busy(&self, worker_id: &WorkerId) -> bool {
        self.is_busy_at(worker_id, &Timestamp::now()).await
    }

    pub async fn is_busy_at(&self, worker_id: &WorkerId, now: &Timestamp) -> bool {
        self.entries
            .read()
            .await
            .iter()
            .any(|e| &e.worker.id == worker_id && e.is_busy_at(now))
    }
}

fn same_location(worker: &Worker, location: &str) -> bool {
    worker
        .location
        .as_deref()
        .is_some_and(|l| l.eq_ignore_ascii_case(location.trim()))
}

#[async_trait]
impl HealthWorkerDispatch for WorkerRoster {
    /// Prefers a free worker covering `location`. High and urgent cases
    /// fall back to any free worker.
    async fn find_available(
        &self,
        location: Option<&str>,
        urgency: Priority,
    ) -> Result<Option<Worker>, DispatchError> {
        let now = Timestamp::now();
        let entries = self.entries.read().await;
        let mut free = entries
            .iter()
            .filter(|e| !e.is_busy_at(&now))
            .map(|e| &e.worker);

        let found = match location {
            None => free.next(),
            Some(location) => {
                let local = entries
                    .iter()
                    .filter(|e| !e.is_busy_at(&now))
                    .map(|e| &e.worker)
                    .find(|w| same_location(w, location));
                match local {
                    Some(worker) => Some(worker),
                    None if urgency >= Priority::High => free.next(),
                    None => None,
                }
            }
        };

        Ok(found.cloned())
    }

    async fn notify(
        &self,
        worker_id: &WorkerId,
        session_id: &SessionId,
        reason: EscalationReason,
        urgency: Priority,
    ) -> Result<(), DispatchError> {
        let now = Timestamp::now();
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| &e.worker.id == worker_id && !e.is_busy_at(&now))
            .ok_or_else(|| DispatchError::WorkerUnavailable(worker_id.clone()))?;

        entry.busy_until = Some(now.plus_secs(self.assignment_ttl.as_secs()));
        tracing::info!(
            worker_id = %worker_id,
            session_id = %session_id,
            reason = reason.as_str(),
            priority = urgency.as_str(),
            ttl_secs = self.assignment_ttl.as_secs(),
            "Health worker notified"
        );
        Ok(())
    }

    async fn release(&self, worker_id: &WorkerId) -> Result<bool, DispatchError> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.iter_mut().find(|e| &e.worker.id == worker_id) else {
            return Ok(false);
        };
        entry.busy_until = None;
        tracing::info!(worker_id = %worker_id, "Health worker released");
        Ok(true)
    }
}
