//! Health worker dispatch adapters.

mod roster;

pub use roster::{RosterError, WorkerRoster, DEFAULT_ASSIGNMENT_TTL};
