//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//!
//! - `handlers` - Conversation orchestrator, session query, lifecycle sweep
//! - `session_store` - Per-(user, platform) serialized repository access
//! - `delivery` - Outbound push with bounded retry

pub mod delivery;
pub mod handlers;
pub mod session_store;

pub use delivery::{DeliveryConfig, OutboundDispatcher};
pub use handlers::{
    GetSessionHandler, GetSessionQuery, HandleMessageCommand, HandleMessageConfig,
    HandleMessageHandler, HandleMessageResult, SessionSweeper, SweepConfig, SweepReport,
};
pub use session_store::{SessionGuard, SessionStore};
