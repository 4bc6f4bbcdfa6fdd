//! In-progress assessment state and its final result.

use serde::{Deserialize, Serialize};

use crate::domain::triage::{RecommendedAction, Severity};

/// Accumulator for one run of the protocol.
///
/// `responses.len() == step_index` between turns; only the engine moves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentState {
    symptom: String,
    step_index: usize,
    responses: Vec<String>,
}

impl AssessmentState {
    pub(super) fn begin(symptom: impl Into<String>) -> Self {
        Self {
            symptom: symptom.into(),
            step_index: 0,
            responses: Vec::new(),
        }
    }

    /// Rebuild from storage without validation; the engine checks the
    /// protocol on the next advance.
    pub fn reconstitute(symptom: String, step_index: usize, responses: Vec<String>) -> Self {
        Self {
            symptom,
            step_index,
            responses,
        }
    }

    pub fn symptom(&self) -> &str {
        &self.symptom
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    pub(super) fn record(&mut self, answer: String) {
        self.responses.push(answer);
        self.step_index += 1;
    }

    pub(super) fn into_responses(self) -> (String, Vec<String>) {
        (self.symptom, self.responses)
    }
}

/// Outcome of a completed protocol, written to the medical record sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub symptom: String,
    pub responses: Vec<String>,
    pub severity: Severity,
    pub condition: String,
    pub recommended_action: RecommendedAction,
    pub summary_text: String,
}
