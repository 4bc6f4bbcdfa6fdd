//! Value types produced by intent classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is trying to do in a single utterance.
///
/// Variant order is the declaration order used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Emergency,
    SymptomCheck,
    Greeting,
    VaccinationInfo,
    Prevention,
    HealthEducation,
    HumanRequest,
    Goodbye,
    /// Fallback when nothing scores above the confidence floor.
    General,
}

impl Intent {
    /// Classifiable intents in declaration order (excludes `General`).
    pub const DECLARED: [Intent; 8] = [
        Intent::Emergency,
        Intent::SymptomCheck,
        Intent::Greeting,
        Intent::VaccinationInfo,
        Intent::Prevention,
        Intent::HealthEducation,
        Intent::HumanRequest,
        Intent::Goodbye,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Emergency => "emergency",
            Intent::SymptomCheck => "symptom_check",
            Intent::Greeting => "greeting",
            Intent::VaccinationInfo => "vaccination_info",
            Intent::Prevention => "prevention",
            Intent::HealthEducation => "health_education",
            Intent::HumanRequest => "human_request",
            Intent::Goodbye => "goodbye",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of entity the extractor recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Age,
    Gender,
    Duration,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Age => "age",
            EntityKind::Gender => "gender",
            EntityKind::Duration => "duration",
        }
    }
}

/// Byte range of an entity inside the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A value pulled out of the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: EntityKind,
    /// Normalised value: digits for age, "male"/"female", "<n> <unit>" for duration.
    pub value: String,
    pub span: Span,
}

impl Entity {
    pub fn new(name: EntityKind, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            name,
            value: value.into(),
            span: Span { start, end },
        }
    }
}

/// Result of classifying one utterance. Never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentClassification {
    pub intent: Intent,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub entities: Vec<Entity>,
}

impl IntentClassification {
    /// First entity of the given kind, if any.
    pub fn entity(&self, kind: EntityKind) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == kind)
    }
}
