//! Fire-and-forget analytics sink.
//!
//! `emit` spawns the publish on the current runtime and returns at once.
//! Publish failures are logged and dropped.

use std::sync::Arc;
use tokio::runtime::Handle;

use crate::domain::foundation::EventEnvelope;
use crate::ports::{AnalyticsSink, EventPublisher};

pub struct PublishingAnalyticsSink {
    publisher: Arc<dyn EventPublisher>,
}

impl PublishingAnalyticsSink {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }
}

impl AnalyticsSink for PublishingAnalyticsSink {
    fn emit(&self, event: EventEnvelope) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(
                event_type = %event.event_type,
                "No async runtime, analytics event dropped"
            );
            return;
        };

        let publisher = Arc::clone(&self.publisher);
        handle.spawn(async move {
            let event_type = event.event_type.clone();
            if let Err(e) = publisher.publish(event).await {
                tracing::warn!(event_type = %event_type, error = %e, "Analytics publish failed");
            }
        });
    }
}
