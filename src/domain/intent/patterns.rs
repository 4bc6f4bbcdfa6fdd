//! Keyword rule groups per intent and language.
//!
//! Each intent owns a list of groups; a group matches when its pattern is
//! found anywhere in the text. English patterns use word boundaries.
//! Devanagari patterns are plain substrings because `\b` does not work
//! across combining marks.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Intent;

/// Rule groups for a single intent.
pub struct IntentRules {
    pub intent: Intent,
    pub groups: Vec<Regex>,
}

impl IntentRules {
    fn new(intent: Intent, patterns: &[&str]) -> Self {
        Self {
            intent,
            groups: patterns
                .iter()
                .map(|p| Regex::new(p).expect("valid intent pattern"))
                .collect(),
        }
    }

    /// Fraction of groups that match `text`.
    pub fn score(&self, text: &str) -> f64 {
        if self.groups.is_empty() {
            return 0.0;
        }
        let matched = self.groups.iter().filter(|g| g.is_match(text)).count();
        matched as f64 / self.groups.len() as f64
    }
}

pub static ENGLISH_RULES: Lazy<Vec<IntentRules>> = Lazy::new(|| {
    vec![
        IntentRules::new(
            Intent::Emergency,
            &[
                r"(?i)\b(emergency|can(?:'|’)?t breathe|cannot breathe|not breathing|chest pain|unconscious|fainted|heart attack|stroke|seizure|severe bleeding|bleeding heavily|suicid\w*|poison\w*)\b",
                r"(?i)\b(urgent\w*|immediately|right now|help me|ambulance|dying)\b",
            ],
        ),
        IntentRules::new(
            Intent::SymptomCheck,
            &[
                r"(?i)\b(fever|temperature|cough\w*|cold|headache|migraine|diarrh(?:o)?ea|loose motions?|vomit\w*|nausea|rash|itch\w*|sore throat|body ache|dizz\w*|fatigue|tired)\b",
                r"(?i)\b(i have|i've got|i got|i am having|i'm having|suffering|i feel|i'm feeling|feeling|my \w+ hurts?)\b",
                r"(?i)\b(pain|ache|aching|hurts?|sore|symptoms?|sick|unwell|ill)\b",
            ],
        ),
        IntentRules::new(
            Intent::Greeting,
            &[
                r"(?i)\b(hi|hello|hey|hiya|namaste|good (?:morning|afternoon|evening))\b",
                r"(?i)\b(how are you|how do you do|what'?s up)\b",
            ],
        ),
        IntentRules::new(
            Intent::VaccinationInfo,
            &[
                r"(?i)\b(vaccin\w*|immuni[sz]\w*|shots?|jabs?|booster|polio|bcg|measles)\b",
                r"(?i)\b(schedule|due|when|which|dose|doses|next)\b",
            ],
        ),
        IntentRules::new(
            Intent::Prevention,
            &[
                r"(?i)\b(prevent\w*|avoid\w*|protect\w*|precaution\w*|stop spreading)\b",
                r"(?i)\b(hygiene|wash\w*|mask\w*|mosquito\w*|clean\w*|sanitiz\w*|boil\w*)\b",
            ],
        ),
        IntentRules::new(
            Intent::HealthEducation,
            &[
                r"(?i)\b(what is|what are|tell me about|information|learn|explain|causes? of)\b",
                r"(?i)\b(diabetes|malaria|dengue|tuberculosis|tb|hypertension|blood pressure|nutrition|diet|an(?:a)?emia|hiv|covid\w*|pregnan\w*)\b",
            ],
        ),
        IntentRules::new(
            Intent::HumanRequest,
            &[
                r"(?i)\b(human|real person|person|agent|doctor|nurse|health worker|asha)\b",
                r"(?i)\b(talk|speak|connect|call|chat) (?:to|with)\b",
            ],
        ),
        IntentRules::new(
            Intent::Goodbye,
            &[
                r"(?i)\b(bye|goodbye|good bye|see you|end chat|end the chat|quit|exit)\b",
                r"(?i)\b(thanks|thank you|that'?s all)\b",
            ],
        ),
    ]
});

pub static HINDI_RULES: Lazy<Vec<IntentRules>> = Lazy::new(|| {
    vec![
        IntentRules::new(
            Intent::Emergency,
            &[
                r"(आपातकाल|इमरजेंसी|सांस नहीं|साँस नहीं|सीने में दर्द|बेहोश|दिल का दौरा|दौरा पड़)",
                r"(तुरंत|जल्दी|मदद करो|एम्बुलेंस|एंबुलेंस)",
            ],
        ),
        IntentRules::new(
            Intent::SymptomCheck,
            &[
                r"(बुखार|खांसी|खाँसी|सिरदर्द|सिर दर्द|दस्त|उल्टी|जुकाम|ज़ुकाम|खुजली|चक्कर)",
                r"(मुझे|मेरे|मेरी|मेरा)",
                r"(दर्द|तकलीफ|परेशानी|बीमार)",
            ],
        ),
        IntentRules::new(
            Intent::Greeting,
            &[
                r"(नमस्ते|नमस्कार|हैलो|हेलो|राम राम)",
                r"(आप कैसे हैं|कैसे हो)",
            ],
        ),
        IntentRules::new(
            Intent::VaccinationInfo,
            &[r"(टीका|टीके|टीकाकरण|वैक्सीन)", r"(कब|कौन सा|कौनसा|खुराक)"],
        ),
        IntentRules::new(
            Intent::Prevention,
            &[r"(बचाव|रोकथाम|बचें|बचना)", r"(सफाई|हाथ धो|मच्छर|मास्क)"],
        ),
        IntentRules::new(
            Intent::HealthEducation,
            &[
                r"(क्या है|क्या होता|जानकारी|बताइए|बताओ)",
                r"(मधुमेह|शुगर|मलेरिया|डेंगू|टीबी|पोषण|गर्भ)",
            ],
        ),
        IntentRules::new(
            Intent::HumanRequest,
            &[
                r"(डॉक्टर|डाक्टर|इंसान|व्यक्ति|आशा|स्वास्थ्य कार्यकर्ता)",
                r"(बात कर|संपर्क|बुलाओ|बुलाइए)",
            ],
        ),
        IntentRules::new(
            Intent::Goodbye,
            &[r"(अलविदा|बाय|फिर मिलेंगे)", r"(धन्यवाद|शुक्रिया)"],
        ),
    ]
});
