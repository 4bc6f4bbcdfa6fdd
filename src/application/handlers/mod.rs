//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;
pub mod session;

pub use conversation::{
    HandleMessageCommand, HandleMessageConfig, HandleMessageHandler, HandleMessageResult,
};
pub use session::{GetSessionHandler, GetSessionQuery, SessionSweeper, SweepConfig, SweepReport};
