//! The fixed five-question assessment protocol.

use crate::domain::foundation::Language;

/// Number of questions in the protocol.
pub const QUESTION_COUNT: usize = 5;

const ENGLISH_QUESTIONS: [&str; QUESTION_COUNT] = [
    "What is your current body temperature?",
    "How many days have you had these symptoms?",
    "Are you experiencing any other symptoms along with this?",
    "Are you currently taking any medication?",
    "Do you have any pre-existing medical conditions?",
];

const HINDI_QUESTIONS: [&str; QUESTION_COUNT] = [
    "आपके शरीर का तापमान अभी कितना है?",
    "आपको ये लक्षण कितने दिनों से हैं?",
    "क्या इसके साथ आपको कोई और लक्षण भी हैं?",
    "क्या आप अभी कोई दवा ले रहे हैं?",
    "क्या आपको पहले से कोई बीमारी है?",
];

const ENGLISH_ACKNOWLEDGEMENTS: &[&str] = &[
    "Thank you.",
    "Got it.",
    "Okay, noted.",
    "Thanks for sharing that.",
];

const HINDI_ACKNOWLEDGEMENTS: &[&str] = &["धन्यवाद।", "ठीक है।", "समझ गया।"];

/// Question for `step`, or `None` past the end of the protocol.
pub fn question(step: usize, language: &Language) -> Option<&'static str> {
    let questions = match language.as_str() {
        Language::HINDI => &HINDI_QUESTIONS,
        _ => &ENGLISH_QUESTIONS,
    };
    questions.get(step).copied()
}

pub fn acknowledgements(language: &Language) -> &'static [&'static str] {
    match language.as_str() {
        Language::HINDI => HINDI_ACKNOWLEDGEMENTS,
        _ => ENGLISH_ACKNOWLEDGEMENTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_question_asks_for_temperature() {
        assert_eq!(
            question(0, &Language::english()),
            Some("What is your current body temperature?")
        );
    }

    #[test]
    fn no_question_past_the_end() {
        assert_eq!(question(QUESTION_COUNT, &Language::english()), None);
    }

    #[test]
    fn unsupported_language_uses_english() {
        assert_eq!(question(3, &Language::new("fr")), question(3, &Language::english()));
        assert!(!acknowledgements(&Language::new("fr")).is_empty());
    }
}
