//! Channel adapter that logs outbound messages instead of sending them.
//!
//! Stands in for a transport until a gateway is configured. Keeps the
//! last messages so tests can inspect delivery.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::Platform;
use crate::domain::messaging::OutboundMessage;
use crate::ports::{ChannelAdapter, ChannelError};

pub struct LoggingChannelAdapter {
    platform: Platform,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl LoggingChannelAdapter {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChannelAdapter for LoggingChannelAdapter {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn send(&self, message: &OutboundMessage) -> Result<(), ChannelError> {
        if message.platform != self.platform {
            return Err(ChannelError::Rejected(format!(
                "{} adapter cannot deliver {} message",
                self.platform, message.platform
            )));
        }

        tracing::info!(
            platform = %self.platform,
            session_id = %message.session_id,
            user_id = %message.user_id,
            escalated = message.escalated,
            buttons = message.buttons.len(),
            "Outbound message"
        );
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        Ok(())
    }
}
