//! Per-session conversation context.
//!
//! Mutated only by the conversation planner's output, which the
//! orchestrator installs on the session once per turn.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::domain::assessment::AssessmentState;
use crate::domain::foundation::Timestamp;
use crate::domain::intent::{Intent, IntentClassification};

/// Maximum number of classified queries remembered.
pub const MAX_PREVIOUS_QUERIES: usize = 20;

/// Coarse conversational mode, used for reply selection and analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    #[default]
    Greeting,
    SymptomCheck,
    VaccinationInfo,
    HealthEducation,
    Emergency,
    Escalated,
}

impl UserState {
    /// State implied by an intent, if it implies one.
    pub fn for_intent(intent: Intent) -> Option<Self> {
        match intent {
            Intent::Greeting => Some(UserState::Greeting),
            Intent::SymptomCheck => Some(UserState::SymptomCheck),
            Intent::VaccinationInfo => Some(UserState::VaccinationInfo),
            Intent::Prevention | Intent::HealthEducation => Some(UserState::HealthEducation),
            Intent::Emergency => Some(UserState::Emergency),
            Intent::HumanRequest | Intent::Goodbye | Intent::General => None,
        }
    }
}

/// One classified user utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub text: String,
    pub intent: Intent,
    pub confidence: f64,
    pub at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    current_intent: Option<Intent>,
    user_state: UserState,
    assessment: Option<AssessmentState>,
    /// Most recent first.
    previous_queries: VecDeque<QueryRecord>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_intent(&self) -> Option<Intent> {
        self.current_intent
    }

    pub fn user_state(&self) -> UserState {
        self.user_state
    }

    pub fn assessment(&self) -> Option<&AssessmentState> {
        self.assessment.as_ref()
    }

    pub fn has_active_assessment(&self) -> bool {
        self.assessment.is_some()
    }

    /// Classified queries, most recent first.
    pub fn previous_queries(&self) -> impl Iterator<Item = &QueryRecord> {
        self.previous_queries.iter()
    }

    pub fn query_count(&self) -> usize {
        self.previous_queries.len()
    }

    /// Records a classified utterance and adopts its intent.
    pub fn record_classification(
        &mut self,
        text: &str,
        classification: &IntentClassification,
        at: Timestamp,
    ) {
        self.previous_queries.push_front(QueryRecord {
            text: text.to_string(),
            intent: classification.intent,
            confidence: classification.confidence,
            at,
        });
        self.previous_queries.truncate(MAX_PREVIOUS_QUERIES);

        self.current_intent = Some(classification.intent);
        if let Some(state) = UserState::for_intent(classification.intent) {
            self.user_state = state;
        }
    }

    /// Installs a new or advanced assessment.
    pub fn set_assessment(&mut self, state: AssessmentState) {
        self.user_state = UserState::SymptomCheck;
        self.assessment = Some(state);
    }

    pub fn clear_assessment(&mut self) -> Option<AssessmentState> {
        self.assessment.take()
    }

    pub fn mark_escalated(&mut self) {
        self.user_state = UserState::Escalated;
    }
}
