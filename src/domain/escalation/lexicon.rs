//! Emergency and human-request keyword lexicons.
//!
//! English is always checked; the Devanagari lexicon is checked too so that
//! code-mixed messages are caught whatever language tag the channel sent.

use once_cell::sync::Lazy;
use regex::Regex;

static EMERGENCY_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(emergency|can(?:'|’)?t breathe|cannot breathe|unable to breathe|not breathing|chest pain|heart attack|stroke|unconscious|fainted|seizure|severe bleeding|bleeding heavily|suicid\w*|kill myself|poison\w*|ambulance|dying)\b",
    )
    .expect("valid emergency lexicon")
});

static EMERGENCY_HI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(आपातकाल|इमरजेंसी|सांस नहीं|साँस नहीं|सीने में दर्द|दिल का दौरा|बेहोश|दौरा पड़|बहुत खून|ज़हर|जहर|एम्बुलेंस|एंबुलेंस)")
        .expect("valid hindi emergency lexicon")
});

static HUMAN_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(talk to (?:a )?(?:doctor|human|person|nurse|someone)|speak to (?:a )?(?:doctor|human|person|nurse|someone)|real person|human agent|health worker|connect me)\b|^\s*(?:human|doctor|agent)\s*[.!?]*\s*$",
    )
    .expect("valid human request lexicon")
});

static HUMAN_HI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(डॉक्टर से बात|डाक्टर से बात|इंसान से बात|किसी से बात|आशा दीदी|स्वास्थ्य कार्यकर्ता)")
        .expect("valid hindi human request lexicon")
});

pub fn mentions_emergency(text: &str) -> bool {
    EMERGENCY_EN.is_match(text) || EMERGENCY_HI.is_match(text)
}

pub fn requests_human(text: &str) -> bool {
    HUMAN_EN.is_match(text) || HUMAN_HI.is_match(text)
}
