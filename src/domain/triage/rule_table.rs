//! Static symptom rule table.
//!
//! A single instance is shared (behind `Arc`) by the assessment engine and
//! the conversation planner's symptom detection, so both always agree on
//! symptom names and severities.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{BySeverity, Recommendation, RecommendedAction, Severity, TriageOutcome};

/// Name used when no known symptom matches.
pub const UNSPECIFIED_SYMPTOM: &str = "unspecified";

static SEVERE_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(severe\w*|intense|worst|unbearable|extreme\w*|very high|can(?:'|’)?t breathe|cannot breathe|chest pain|unconscious|bleeding|blood in \w+)\b",
    )
    .expect("valid severe regex")
});

static SEVERE_HI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(बहुत तेज|बहुत ज़्यादा|बहुत ज्यादा|गंभीर|असहनीय|सांस नहीं|साँस नहीं|खून)")
        .expect("valid hindi severe regex")
});

static MODERATE_EN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(moderate\w*|bad|worse|quite|getting worse)\b").expect("valid moderate regex")
});

static MODERATE_HI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(मध्यम|काफी|ज़्यादा|ज्यादा|बढ़ रहा)").expect("valid hindi moderate regex")
});

/// Rule for one symptom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomRule {
    pub symptom: String,
    /// Lowercase terms (English or Devanagari) that identify the symptom.
    pub synonyms: Vec<String>,
    pub conditions: BySeverity<String>,
    pub recommendations: BySeverity<Recommendation>,
}

impl SymptomRule {
    fn matches(&self, lowered: &str) -> bool {
        self.synonyms.iter().any(|term| contains_term(lowered, term))
    }
}

/// Symptom -> severity -> condition / recommendation lookup.
#[derive(Debug, Clone)]
pub struct TriageRuleTable {
    rules: Vec<SymptomRule>,
    fallback: SymptomRule,
}

impl TriageRuleTable {
    /// Builds a table from explicit rules plus the unspecified fallback.
    pub fn new(rules: Vec<SymptomRule>) -> Self {
        Self {
            rules,
            fallback: unspecified_rule(),
        }
    }

    /// The built-in primary-care symptom set.
    pub fn standard() -> Self {
        Self::new(standard_rules())
    }

    pub fn rules(&self) -> &[SymptomRule] {
        &self.rules
    }

    /// First known symptom mentioned in `text`, in table order.
    pub fn detect_symptom(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.symptom.as_str())
    }

    /// Rule for a canonical symptom name or synonym; never fails.
    pub fn rule_for(&self, symptom: &str) -> &SymptomRule {
        let lowered = symptom.trim().to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.symptom == lowered || rule.matches(&lowered))
            .unwrap_or(&self.fallback)
    }

    /// Highest intensity found across all texts.
    pub fn severity_of<'a, I>(texts: I) -> Severity
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts
            .into_iter()
            .map(intensity)
            .max()
            .unwrap_or(Severity::Mild)
    }

    /// Full lookup: severity from `texts`, condition and advice from the
    /// symptom's rule (or the fallback).
    pub fn evaluate<'a, I>(&self, symptom: &str, texts: I) -> TriageOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rule = self.rule_for(symptom);
        let severity = Self::severity_of(texts);
        TriageOutcome {
            symptom: rule.symptom.clone(),
            severity,
            condition: rule.conditions.get(severity).clone(),
            recommendation: rule.recommendations.get(severity).clone(),
        }
    }
}

impl Default for TriageRuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn intensity(text: &str) -> Severity {
    if SEVERE_EN.is_match(text) || SEVERE_HI.is_match(text) {
        Severity::Severe
    } else if MODERATE_EN.is_match(text) || MODERATE_HI.is_match(text) {
        Severity::Moderate
    } else {
        Severity::Mild
    }
}

/// Whole-word containment for ASCII terms, substring for everything else.
fn contains_term(haystack: &str, term: &str) -> bool {
    if !term.is_ascii() {
        return haystack.contains(term);
    }
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

fn rule(
    symptom: &str,
    synonyms: &[&str],
    conditions: [&str; 3],
    recommendations: [(RecommendedAction, &str); 3],
) -> SymptomRule {
    let [c_mild, c_moderate, c_severe] = conditions;
    let [r_mild, r_moderate, r_severe] = recommendations;
    SymptomRule {
        symptom: symptom.to_string(),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        conditions: BySeverity::new(c_mild.into(), c_moderate.into(), c_severe.into()),
        recommendations: BySeverity::new(
            Recommendation::new(r_mild.0, r_mild.1),
            Recommendation::new(r_moderate.0, r_moderate.1),
            Recommendation::new(r_severe.0, r_severe.1),
        ),
    }
}

fn unspecified_rule() -> SymptomRule {
    use RecommendedAction::*;
    rule(
        UNSPECIFIED_SYMPTOM,
        &[],
        [
            "unspecified condition",
            "unspecified condition",
            "unspecified condition",
        ],
        [
            (VisitClinic, "Please visit your nearest clinic for a check-up."),
            (VisitClinic, "Please visit your nearest clinic within a day."),
            (VisitClinic, "Please visit your nearest clinic as soon as possible."),
        ],
    )
}

fn standard_rules() -> Vec<SymptomRule> {
    use RecommendedAction::*;
    vec![
        rule(
            "fever",
            &["fever", "feverish", "temperature", "बुखार", "ताप"],
            ["common viral fever", "viral infection", "possible malaria, dengue or typhoid"],
            [
                (SelfCare, "Rest, drink plenty of fluids and take paracetamol if needed."),
                (VisitClinic, "Please visit a clinic within 24 hours for a check-up and blood test."),
                (SeekUrgentCare, "Please go to the nearest hospital immediately."),
            ],
        ),
        rule(
            "cough",
            &["cough", "coughing", "खांसी", "खाँसी"],
            ["common cold", "bronchitis", "possible pneumonia or tuberculosis"],
            [
                (SelfCare, "Drink warm fluids, rest and avoid smoke or dust."),
                (VisitClinic, "Please visit a clinic if the cough lasts more than a week."),
                (SeekUrgentCare, "Please seek medical care immediately."),
            ],
        ),
        rule(
            "headache",
            &["headache", "migraine", "head pain", "सिरदर्द", "सिर दर्द"],
            ["tension headache", "migraine", "possible serious neurological condition"],
            [
                (SelfCare, "Rest in a quiet room and drink water."),
                (VisitClinic, "Please visit a clinic if headaches keep returning."),
                (SeekUrgentCare, "Please seek emergency care for a sudden severe headache."),
            ],
        ),
        rule(
            "diarrhea",
            &["diarrhea", "diarrhoea", "loose motion", "loose motions", "दस्त"],
            ["mild stomach upset", "gastroenteritis", "severe dehydration risk"],
            [
                (SelfCare, "Drink ORS and clean water frequently."),
                (VisitClinic, "Please visit a clinic if it continues beyond two days."),
                (SeekUrgentCare, "Please go to a hospital immediately for rehydration."),
            ],
        ),
        rule(
            "vomiting",
            &["vomit", "vomiting", "nausea", "उल्टी"],
            ["indigestion", "food poisoning", "possible serious infection"],
            [
                (SelfCare, "Take small sips of ORS and eat light food."),
                (VisitClinic, "Please visit a clinic if you cannot keep fluids down."),
                (SeekUrgentCare, "Please seek urgent medical care."),
            ],
        ),
        rule(
            "stomach pain",
            &["stomach pain", "stomach ache", "abdominal pain", "पेट दर्द", "पेट में दर्द"],
            ["indigestion", "gastritis", "possible appendicitis"],
            [
                (SelfCare, "Eat light meals and avoid spicy food."),
                (VisitClinic, "Please visit a clinic for an examination."),
                (SeekUrgentCare, "Please go to the nearest hospital immediately."),
            ],
        ),
        rule(
            "cold",
            &["cold", "runny nose", "sneezing", "जुकाम", "ज़ुकाम", "सर्दी"],
            ["common cold", "sinus infection", "possible flu complication"],
            [
                (SelfCare, "Rest, drink warm fluids and try steam inhalation."),
                (VisitClinic, "Please visit a clinic if symptoms last more than a week."),
                (SeekUrgentCare, "Please seek medical care promptly."),
            ],
        ),
        rule(
            "rash",
            &["rash", "itching", "itchy", "खुजली", "दाने"],
            ["skin irritation", "allergic reaction", "possible severe allergic reaction"],
            [
                (SelfCare, "Keep the area clean and dry and avoid scratching."),
                (VisitClinic, "Please visit a clinic to have the rash examined."),
                (SeekUrgentCare, "Please seek emergency care, especially if there is swelling."),
            ],
        ),
    ]
}
