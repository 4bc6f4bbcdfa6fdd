//! Outbound reply and quick-reply buttons.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Language, Platform, SessionId, UserId};
use crate::domain::intent::Intent;

/// Quick-reply option rendered by channels that support it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Text sent back as the user's message when tapped.
    pub payload: String,
    pub title: String,
}

impl Button {
    pub fn new(payload: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub platform: Platform,
    pub language: Language,
    pub text: String,
    pub buttons: Vec<Button>,
    pub escalated: bool,
}

/// Quick replies offered after greeting and general replies.
pub fn quick_replies(intent: Intent, language: &Language, platform: Platform) -> Vec<Button> {
    if !platform.supports_buttons() || !matches!(intent, Intent::Greeting | Intent::General) {
        return Vec::new();
    }
    let options: [(&str, &str); 3] = match language.as_str() {
        Language::HINDI => [
            ("मुझे बुखार है", "लक्षण जाँचें"),
            ("टीकाकरण कब है", "टीकाकरण"),
            ("डॉक्टर से बात", "स्वास्थ्य कार्यकर्ता"),
        ],
        _ => [
            ("I have symptoms", "Check symptoms"),
            ("vaccination schedule", "Vaccinations"),
            ("talk to a health worker", "Talk to a health worker"),
        ],
    };
    options
        .iter()
        .map(|(payload, title)| Button::new(*payload, *title))
        .collect()
}

/// Sent when a turn cannot produce a normal reply.
pub fn apology(language: &Language) -> &'static str {
    match language.as_str() {
        Language::HINDI => "क्षमा करें, अभी कुछ गड़बड़ हो गई। कृपया अपना संदेश दोबारा भेजें।",
        _ => "Sorry, something went wrong on our side. Please send your message again.",
    }
}
