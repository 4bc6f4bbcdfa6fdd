//! Analytics sink port.
//!
//! `emit` is synchronous and infallible from the caller's point of view:
//! implementations hand the envelope off (typically by spawning a task)
//! and never block or fail the turn.

use crate::domain::foundation::EventEnvelope;

pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: EventEnvelope);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analytics_sink_is_object_safe() {
        fn _accepts_dyn(_sink: &dyn AnalyticsSink) {}
    }
}
