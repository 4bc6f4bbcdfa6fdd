//! Keyword/pattern intent classifier.

use crate::domain::foundation::Language;

use super::entities::extract_entities;
use super::patterns::{IntentRules, ENGLISH_RULES, HINDI_RULES};
use super::{Intent, IntentClassification};

/// Scores below this fall back to `Intent::General`.
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// Subtracted from every score when the language has no rule set.
pub const UNKNOWN_LANGUAGE_PENALTY: f64 = 0.1;

/// Stateless classifier; cheap to share across tasks.
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    floor: f64,
    unknown_language_penalty: f64,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self {
            floor: CONFIDENCE_FLOOR,
            unknown_language_penalty: UNKNOWN_LANGUAGE_PENALTY,
        }
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Classifies `text`. Never fails: low scores degrade to `General`
    /// carrying the best (sub-floor) score.
    pub fn classify(&self, text: &str, language: &Language) -> IntentClassification {
        let (rules, penalty) = self.rules_for(language);

        let mut best = (Intent::General, 0.0_f64);
        for rule in rules {
            let score = (rule.score(text) - penalty).max(0.0);
            // Strict comparison keeps the first-declared intent on ties.
            if score > best.1 {
                best = (rule.intent, score);
            }
        }

        let (intent, confidence) = if best.1 < self.floor {
            (Intent::General, best.1)
        } else {
            best
        };

        IntentClassification {
            intent,
            confidence,
            entities: extract_entities(text),
        }
    }

    fn rules_for(&self, language: &Language) -> (&'static [IntentRules], f64) {
        match language.as_str() {
            Language::ENGLISH => (ENGLISH_RULES.as_slice(), 0.0),
            Language::HINDI => (HINDI_RULES.as_slice(), 0.0),
            _ => (ENGLISH_RULES.as_slice(), self.unknown_language_penalty),
        }
    }
}
