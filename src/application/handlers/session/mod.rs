//! Session query handlers and the lifecycle sweep.

mod get_session;
mod sweep_sessions;

pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use sweep_sessions::{SessionSweeper, SweepConfig, SweepReport};
