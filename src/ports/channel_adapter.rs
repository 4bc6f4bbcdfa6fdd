//! Channel adapter port.
//!
//! Outbound half of a transport (WhatsApp, SMS gateway, IVR). Inbound is
//! push-based through the HTTP webhooks.

use async_trait::async_trait;

use crate::domain::foundation::Platform;
use crate::domain::messaging::OutboundMessage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {0} is not configured")]
    NotConfigured(Platform),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Recipient rejected: {0}")]
    Rejected(String),
}

impl ChannelError {
    /// Transient failures are retried by the delivery service.
    pub fn is_transient(&self) -> bool {
        matches!(self, ChannelError::DeliveryFailed(_))
    }
}

#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    async fn send(&self, message: &OutboundMessage) -> Result<(), ChannelError>;
}
