//! Language tag value object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// BCP-47 style language tag reduced to its lowercase primary subtag.
///
/// `"en-IN"`, `"EN"` and `"en_US"` all become `"en"`. Blank input falls
/// back to English.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub const ENGLISH: &'static str = "en";
    pub const HINDI: &'static str = "hi";

    pub fn new(tag: impl AsRef<str>) -> Self {
        let primary = tag
            .as_ref()
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if primary.is_empty() {
            Self::english()
        } else {
            Self(primary)
        }
    }

    pub fn english() -> Self {
        Self(Self::ENGLISH.to_string())
    }

    pub fn hindi() -> Self {
        Self(Self::HINDI.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0 == Self::ENGLISH
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::english()
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
