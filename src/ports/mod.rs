//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `SessionRepository` - Session aggregate persistence per (user, platform)
//! - `MedicalRecordSink` - Completed assessment records
//!
//! ## Collaborator Ports
//!
//! - `HealthWorkerDispatch` - Find and notify health workers
//! - `ReplyGenerator` - Display text for non-assessment turns
//! - `ChannelAdapter` - Outbound transport per platform
//!
//! ## Event Ports
//!
//! - `AnalyticsSink` - Fire-and-forget analytics emission
//! - `EventPublisher` - Transport behind the analytics sink

mod analytics_sink;
mod channel_adapter;
mod event_publisher;
mod health_worker_dispatch;
mod medical_record_sink;
mod reply_generator;
mod session_repository;

pub use analytics_sink::AnalyticsSink;
pub use channel_adapter::{ChannelAdapter, ChannelError};
pub use event_publisher::EventPublisher;
pub use health_worker_dispatch::{DispatchError, HealthWorkerDispatch, Worker};
pub use medical_record_sink::MedicalRecordSink;
pub use reply_generator::{ReplyError, ReplyGenerator, ReplyRequest};
pub use session_repository::SessionRepository;
