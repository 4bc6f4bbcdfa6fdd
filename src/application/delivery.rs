//! Outbound delivery to channel adapters with bounded retry.
//!
//! Delivery runs detached from the turn: a failed send is logged and never
//! rolls back session state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use crate::domain::foundation::Platform;
use crate::domain::messaging::OutboundMessage;
use crate::ports::{ChannelAdapter, ChannelError};

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Total attempts per message, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub initial_backoff: Duration,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
        }
    }
}

impl DeliveryConfig {
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

pub struct OutboundDispatcher {
    adapters: HashMap<Platform, Arc<dyn ChannelAdapter>>,
    config: DeliveryConfig,
}

impl OutboundDispatcher {
    pub fn new(config: DeliveryConfig) -> Self {
        Self {
            adapters: HashMap::new(),
            config,
        }
    }

    /// Registers the adapter for its platform, replacing any previous one.
    pub fn with_adapter(mut self, adapter: Arc<dyn ChannelAdapter>) -> Self {
        self.adapters.insert(adapter.platform(), adapter);
        self
    }

    pub fn has_adapter(&self, platform: Platform) -> bool {
        self.adapters.contains_key(&platform)
    }

    /// Sends `message`, retrying transient failures. Returns the number of
    /// attempts used.
    pub async fn deliver(&self, message: &OutboundMessage) -> Result<u32, ChannelError> {
        let adapter = self
            .adapters
            .get(&message.platform)
            .ok_or(ChannelError::NotConfigured(message.platform))?;

        let mut backoff = self.config.initial_backoff;
        let mut attempt = 1;
        loop {
            match adapter.send(message).await {
                Ok(()) => return Ok(attempt),
                Err(err) if err.is_transient() && attempt < self.config.max_attempts => {
                    tracing::debug!(
                        session_id = %message.session_id,
                        attempt,
                        error = %err,
                        "Delivery failed, retrying"
                    );
                    sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Delivers in the background. Failures are logged.
    pub fn dispatch(self: &Arc<Self>, message: OutboundMessage) {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = dispatcher.deliver(&message).await {
                tracing::error!(
                    session_id = %message.session_id,
                    platform = %message.platform,
                    error = %err,
                    "Outbound delivery failed"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Language, SessionId, UserId};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FlakyAdapter {
        failures: Mutex<Vec<ChannelError>>,
        attempts: Mutex<u32>,
    }

    impl FlakyAdapter {
        fn failing_with(failures: Vec<ChannelError>) -> Arc<Self> {
            Arc::new(Self {
                failures: Mutex::new(failures),
                attempts: Mutex::new(0),
            })
        }

        fn attempts(&self) -> u32 {
            *self.attempts.lock().unwrap()
        }
    }

    #[async_trait]
    impl ChannelAdapter for FlakyAdapter {
        fn platform(&self) -> Platform {
            Platform::Sms
        }

        async fn send(&self, _message: &OutboundMessage) -> Result<(), ChannelError> {
            *self.attempts.lock().unwrap() += 1;
            let mut failures = self.failures.lock().unwrap();
            if failures.is_empty() {
                Ok(())
            } else {
                Err(failures.remove(0))
            }
        }
    }

    fn message(platform: Platform) -> OutboundMessage {
        OutboundMessage {
            session_id: SessionId::new(),
            user_id: UserId::new("+919800000000").unwrap(),
            platform,
            language: Language::english(),
            text: "Take care.".into(),
            buttons: vec![],
            escalated: false,
        }
    }

    fn dispatcher(adapter: Arc<FlakyAdapter>) -> OutboundDispatcher {
        OutboundDispatcher::new(
            DeliveryConfig::default().with_initial_backoff(Duration::from_millis(1)),
        )
        .with_adapter(adapter)
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let adapter = FlakyAdapter::failing_with(vec![
            ChannelError::DeliveryFailed("502".into()),
            ChannelError::DeliveryFailed("502".into()),
        ]);
        let attempts = dispatcher(adapter.clone())
            .deliver(&message(Platform::Sms))
            .await
            .unwrap();
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let adapter = FlakyAdapter::failing_with(vec![
            ChannelError::DeliveryFailed("502".into());
            5
        ]);
        let result = dispatcher(adapter.clone())
            .deliver(&message(Platform::Sms))
            .await;
        assert!(result.is_err());
        assert_eq!(adapter.attempts(), 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let adapter = FlakyAdapter::failing_with(vec![ChannelError::Rejected("blocked".into())]);
        let result = dispatcher(adapter.clone())
            .deliver(&message(Platform::Sms))
            .await;
        assert!(matches!(result, Err(ChannelError::Rejected(_))));
        assert_eq!(adapter.attempts(), 1);
    }

    #[tokio::test]
    async fn missing_adapter_is_not_configured() {
        let adapter = FlakyAdapter::failing_with(vec![]);
        let result = dispatcher(adapter)
            .deliver(&message(Platform::Ivr))
            .await;
        assert_eq!(result, Err(ChannelError::NotConfigured(Platform::Ivr)));
    }
}
