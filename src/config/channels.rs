//! Channel configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelsConfig {
    /// WhatsApp app secret. When set, webhook payloads must carry a valid
    /// `X-Hub-Signature-256` header.
    pub whatsapp_app_secret: Option<Secret<String>>,
}

impl ChannelsConfig {
    pub fn whatsapp_app_secret(&self) -> Option<&str> {
        self.whatsapp_app_secret
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_disables_verification() {
        let config = ChannelsConfig {
            whatsapp_app_secret: Some(Secret::new(String::new())),
        };
        assert!(config.whatsapp_app_secret().is_none());
    }
}
