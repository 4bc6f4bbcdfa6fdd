//! Storage Adapters
//!
//! Implementations of the SessionRepository port.
//!
//! - **InMemorySessionRepository** - Sessions in process memory

mod in_memory_session_repository;

pub use in_memory_session_repository::InMemorySessionRepository;
