//! Typed inbound message, validated at the channel boundary.

use crate::domain::foundation::{Language, Platform, Timestamp, UserId, ValidationError};

/// Longest accepted message body, in characters.
pub const MAX_TEXT_CHARS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub user_id: UserId,
    pub platform: Platform,
    /// Trimmed, non-empty.
    pub text: String,
    pub language: Language,
    pub location: Option<String>,
    pub received_at: Timestamp,
}

impl InboundMessage {
    /// Validates raw channel fields.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for a blank user id or text
    /// - `TooLong` when the text exceeds [`MAX_TEXT_CHARS`]
    /// - `InvalidFormat` for an unknown platform
    pub fn parse(
        user_id: &str,
        platform: &str,
        text: &str,
        language: Option<&str>,
        location: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let user_id = UserId::new(user_id.trim())?;
        let platform: Platform = platform.parse()?;

        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(ValidationError::too_long("text", MAX_TEXT_CHARS, chars));
        }

        Ok(Self {
            user_id,
            platform,
            text: text.to_string(),
            language: language.map(Language::new).unwrap_or_default(),
            location: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            received_at: Timestamp::now(),
        })
    }
}
