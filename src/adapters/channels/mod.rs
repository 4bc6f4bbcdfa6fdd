//! Channel adapters (outbound transports).

mod logging;

pub use logging::LoggingChannelAdapter;
