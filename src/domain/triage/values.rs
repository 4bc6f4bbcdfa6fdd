//! Severity and recommendation values shared by triage and assessment.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    SelfCare,
    VisitClinic,
    SeekUrgentCare,
}

/// One value per severity level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BySeverity<T> {
    pub mild: T,
    pub moderate: T,
    pub severe: T,
}

impl<T> BySeverity<T> {
    pub fn new(mild: T, moderate: T, severe: T) -> Self {
        Self {
            mild,
            moderate,
            severe,
        }
    }

    pub fn get(&self, severity: Severity) -> &T {
        match severity {
            Severity::Mild => &self.mild,
            Severity::Moderate => &self.moderate,
            Severity::Severe => &self.severe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: RecommendedAction,
    pub text: String,
}

impl Recommendation {
    pub fn new(action: RecommendedAction, text: impl Into<String>) -> Self {
        Self {
            action,
            text: text.into(),
        }
    }
}

/// What the rule table concluded for one symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub symptom: String,
    pub severity: Severity,
    pub condition: String,
    pub recommendation: Recommendation,
}
