//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Session repositories
//! - `records` - Medical record sinks
//! - `dispatch` - Health worker roster
//! - `reply` - Template, OpenAI and failover reply generators
//! - `channels` - Outbound channel transports
//! - `events` - Analytics publishers
//! - `http` - axum routes for webhooks and session views

pub mod channels;
pub mod dispatch;
pub mod events;
pub mod http;
pub mod records;
pub mod reply;
pub mod storage;

pub use channels::LoggingChannelAdapter;
pub use dispatch::WorkerRoster;
pub use events::{InMemoryEventBus, LoggingEventPublisher, PublishingAnalyticsSink};
pub use records::InMemoryMedicalRecords;
pub use reply::{FailoverReplyGenerator, OpenAIReplyGenerator, TemplateReplyGenerator};
pub use storage::InMemorySessionRepository;
