//! Event adapters.
//!
//! - `InMemoryEventBus` - Capturing publisher for tests
//! - `LoggingEventPublisher` - Writes envelopes to the structured log
//! - `PublishingAnalyticsSink` - Fire-and-forget sink over any publisher

mod analytics;
mod in_memory;
mod logging;

pub use analytics::PublishingAnalyticsSink;
pub use in_memory::InMemoryEventBus;
pub use logging::LoggingEventPublisher;
