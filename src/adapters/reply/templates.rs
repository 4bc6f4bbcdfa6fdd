//! Templated replies in English and Hindi.
//!
//! Always available; the failover generator lands here when the LLM
//! provider is down.

use async_trait::async_trait;

use crate::domain::foundation::Language;
use crate::domain::intent::{EntityKind, Intent};
use crate::ports::{ReplyError, ReplyGenerator, ReplyRequest};

pub const GREETING_EN: &str = "Hi, how are you? How can I help you today?";

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateReplyGenerator;

impl TemplateReplyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic reply for a request.
    pub fn render(&self, request: &ReplyRequest) -> String {
        let hindi = request.language.as_str() == Language::HINDI;
        match request.intent {
            Intent::Greeting if hindi => "नमस्ते, आप कैसे हैं? आज मैं आपकी क्या मदद कर सकता हूँ?".into(),
            Intent::Greeting => GREETING_EN.into(),
            Intent::VaccinationInfo => vaccination_reply(age_of(request), hindi),
            Intent::SymptomCheck if hindi => {
                "कृपया अपना मुख्य लक्षण बताइए, जैसे बुखार, खांसी या सिरदर्द।".into()
            }
            Intent::SymptomCheck => {
                "Please tell me your main symptom, for example fever, cough or headache.".into()
            }
            Intent::Prevention if hindi => {
                "बीमारी से बचने के लिए साबुन से हाथ धोएँ, उबला या साफ़ पानी पिएँ और मच्छरदानी का उपयोग करें।".into()
            }
            Intent::Prevention => {
                "To stay healthy, wash your hands with soap, drink boiled or filtered water and sleep under a mosquito net.".into()
            }
            Intent::HealthEducation if hindi => {
                "संतुलित भोजन, पर्याप्त पानी और नियमित व्यायाम अच्छे स्वास्थ्य की नींव हैं। आप किस विषय के बारे में जानना चाहते हैं?".into()
            }
            Intent::HealthEducation => {
                "A balanced diet, enough water and regular exercise are the basics of good health. Which topic would you like to know more about?".into()
            }
            Intent::Emergency if hindi => {
                "यह आपातकाल लगता है। कृपया तुरंत नज़दीकी अस्पताल जाएँ।".into()
            }
            Intent::Emergency => {
                "This sounds like an emergency. Please go to the nearest hospital immediately.".into()
            }
            Intent::HumanRequest if hindi => "मैं आपको स्वास्थ्य कार्यकर्ता से जोड़ रहा हूँ।".into(),
            Intent::HumanRequest => "I am connecting you to a health worker.".into(),
            Intent::Goodbye if hindi => "अपना ख्याल रखें। ज़रूरत हो तो फिर संदेश भेजें।".into(),
            Intent::Goodbye => "Take care. Message again any time you need help.".into(),
            Intent::General if hindi => {
                "मुझे ठीक से समझ नहीं आया। क्या आप अपने लक्षण या सवाल दोबारा बता सकते हैं?".into()
            }
            Intent::General => {
                "I did not quite understand. Could you describe your symptoms or question again?".into()
            }
        }
    }
}

fn age_of(request: &ReplyRequest) -> Option<u32> {
    request
        .entities
        .iter()
        .find(|e| e.name == EntityKind::Age)
        .and_then(|e| e.value.parse().ok())
}

fn vaccination_reply(age: Option<u32>, hindi: bool) -> String {
    match (age, hindi) {
        (Some(0), false) => "For babies under one year: BCG, OPV and Hepatitis B at birth, then Pentavalent, OPV and Rotavirus at 6, 10 and 14 weeks, and Measles-Rubella at 9 months.".into(),
        (Some(0), true) => "एक साल से छोटे बच्चों के लिए: जन्म पर BCG, OPV और हेपेटाइटिस B, फिर 6, 10 और 14 सप्ताह पर पेंटावेलेंट, OPV और रोटावायरस, और 9 महीने पर खसरा-रूबेला।".into(),
        (Some(age @ 1..=5), false) => format!("At age {}, make sure the Measles-Rubella second dose and DPT boosters (16-24 months and 5 years) are done.", age),
        (Some(age @ 1..=5), true) => format!("{} वर्ष की उम्र में खसरा-रूबेला की दूसरी खुराक और DPT बूस्टर (16-24 महीने और 5 वर्ष) ज़रूर लगवाएँ।", age),
        (Some(age @ 6..=16), false) => format!("At age {}, Td vaccine is given at 10 and 16 years.", age),
        (Some(age @ 6..=16), true) => format!("{} वर्ष की उम्र के लिए: Td टीका 10 और 16 वर्ष पर लगता है।", age),
        (Some(age), false) => format!("At age {}, adults should keep Td up to date every 10 years; pregnant women need two Td doses.", age),
        (Some(age), true) => format!("{} वर्ष की उम्र में हर 10 साल पर Td टीका लें; गर्भवती महिलाओं को Td की दो खुराक चाहिए।", age),
        (None, false) => "Vaccines protect against serious diseases. Tell me the age of the person and I can share the schedule.".into(),
        (None, true) => "टीके गंभीर बीमारियों से बचाते हैं। व्यक्ति की उम्र बताइए, मैं टीकाकरण सूची बता दूँगा।".into(),
    }
}

#[async_trait]
impl ReplyGenerator for TemplateReplyGenerator {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, ReplyError> {
        Ok(self.render(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intent::Entity;

    fn request(intent: Intent, language: Language, entities: Vec<Entity>) -> ReplyRequest {
        ReplyRequest {
            intent,
            entities,
            language,
            user_text: String::new(),
        }
    }

    #[test]
    fn english_greeting_is_fixed() {
        let reply = TemplateReplyGenerator::new()
            .render(&request(Intent::Greeting, Language::english(), vec![]));
        assert_eq!(reply, "Hi, how are you? How can I help you today?");
    }

    #[test]
    fn hindi_greeting_is_localized() {
        let reply = TemplateReplyGenerator::new()
            .render(&request(Intent::Greeting, Language::hindi(), vec![]));
        assert!(reply.starts_with("नमस्ते"));
    }

    #[test]
    fn vaccination_reply_uses_age_entity() {
        let age = Entity::new(EntityKind::Age, "3", 0, 1);
        let reply = TemplateReplyGenerator::new()
            .render(&request(Intent::VaccinationInfo, Language::english(), vec![age]));
        assert!(reply.contains("At age 3"));
    }

    #[test]
    fn vaccination_reply_without_age_asks_for_it() {
        let reply = TemplateReplyGenerator::new()
            .render(&request(Intent::VaccinationInfo, Language::english(), vec![]));
        assert!(reply.contains("Tell me the age"));
    }

    #[test]
    fn unknown_language_gets_english() {
        let reply = TemplateReplyGenerator::new()
            .render(&request(Intent::Goodbye, Language::new("fr"), vec![]));
        assert!(reply.starts_with("Take care"));
    }

    #[tokio::test]
    async fn generate_never_fails() {
        let gen = TemplateReplyGenerator::new();
        for intent in Intent::DECLARED.iter().chain([Intent::General].iter()) {
            let result = gen
                .generate(&request(*intent, Language::hindi(), vec![]))
                .await;
            assert!(!result.unwrap().is_empty());
        }
    }
}
