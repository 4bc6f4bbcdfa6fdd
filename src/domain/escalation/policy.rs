//! Escalation policy: a pure decision over the turn's inputs.

use crate::domain::assessment::AssessmentResult;
use crate::domain::intent::{Intent, IntentClassification, CONFIDENCE_FLOOR};
use crate::domain::session::ConversationContext;
use crate::domain::triage::Severity;

use super::lexicon::{mentions_emergency, requests_human};
use super::{EscalationDecision, EscalationReason, Priority};

/// Consecutive low-confidence turns with the same intent that trigger
/// a hand-off.
pub const REPEATED_INTENT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct EscalationPolicy {
    floor: f64,
    repeat_window: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            floor: CONFIDENCE_FLOOR,
            repeat_window: REPEATED_INTENT_WINDOW,
        }
    }
}

impl EscalationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// First matching rule wins:
    ///
    /// 1. emergency keyword in `latest_text`, or an `Emergency` intent -> urgent
    /// 2. completed assessment rated severe -> high
    /// 3. same intent under the floor for the last N classified turns -> medium
    /// 4. explicit request for a human -> medium
    ///
    /// `context` must already include this turn's classification, if any.
    pub fn decide(
        &self,
        context: &ConversationContext,
        classification: Option<&IntentClassification>,
        latest_text: &str,
        assessment: Option<&AssessmentResult>,
    ) -> Option<EscalationDecision> {
        let classified_emergency =
            classification.map_or(false, |c| c.intent == Intent::Emergency);
        if classified_emergency || mentions_emergency(latest_text) {
            return Some(EscalationDecision::new(
                EscalationReason::ExplicitEmergencyKeyword,
                Priority::Urgent,
            ));
        }

        if assessment.map_or(false, |result| result.severity == Severity::Severe) {
            return Some(EscalationDecision::new(
                EscalationReason::CriticalSeverityAssessment,
                Priority::High,
            ));
        }

        if classification.is_some() && self.is_stuck(context) {
            return Some(EscalationDecision::new(
                EscalationReason::RepeatedUnresolvedIntent,
                Priority::Medium,
            ));
        }

        let asked_for_human =
            classification.map_or(false, |c| c.intent == Intent::HumanRequest);
        if asked_for_human || requests_human(latest_text) {
            return Some(EscalationDecision::new(
                EscalationReason::UserRequestedHuman,
                Priority::Medium,
            ));
        }

        None
    }

    fn is_stuck(&self, context: &ConversationContext) -> bool {
        let recent: Vec<_> = context.previous_queries().take(self.repeat_window).collect();
        if recent.len() < self.repeat_window {
            return false;
        }
        let intent = recent[0].intent;
        recent
            .iter()
            .all(|q| q.intent == intent && q.confidence < self.floor)
    }
}
