//! Channel a conversation arrives on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Inbound/outbound channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Whatsapp,
    Sms,
    Ivr,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Whatsapp => "whatsapp",
            Platform::Sms => "sms",
            Platform::Ivr => "ivr",
        }
    }

    /// Web replies travel back in the HTTP response; every other channel
    /// needs an outbound push through its adapter.
    pub fn requires_push(&self) -> bool {
        !matches!(self, Platform::Web)
    }

    /// Voice and SMS cannot render quick-reply buttons.
    pub fn supports_buttons(&self) -> bool {
        matches!(self, Platform::Web | Platform::Whatsapp)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Ok(Platform::Web),
            "whatsapp" => Ok(Platform::Whatsapp),
            "sms" => Ok(Platform::Sms),
            "ivr" => Ok(Platform::Ivr),
            other => Err(ValidationError::invalid_format(
                "platform",
                format!("unknown platform '{}'", other),
            )),
        }
    }
}
