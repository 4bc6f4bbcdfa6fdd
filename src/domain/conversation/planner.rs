//! Conversation planner - pure per-turn decision logic.
//!
//! Given the session's context and the user's text, decides what the turn
//! does (ask the next question, finish an assessment, or hand over to the
//! reply generator) and whether to escalate. No I/O; the orchestrator runs
//! it on a blocking thread under the turn timeout and performs the effects.

use std::sync::Arc;

use crate::domain::assessment::{
    AssessmentEngine, AssessmentError, AssessmentResult, AssessmentStep, PhraseSelector,
};
use crate::domain::escalation::{EscalationDecision, EscalationPolicy};
use crate::domain::foundation::{Language, Timestamp};
use crate::domain::intent::{Entity, Intent, IntentClassification, IntentClassifier};
use crate::domain::session::ConversationContext;
use crate::domain::triage::{TriageRuleTable, UNSPECIFIED_SYMPTOM};

/// What the turn produces before escalation is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedAction {
    /// Assessment started or advanced; `text` is the outbound question.
    Question { text: String, step_index: usize },
    /// Fifth answer received.
    AssessmentComplete(AssessmentResult),
    /// Free reply through the reply generator.
    Reply { intent: Intent, entities: Vec<Entity> },
}

/// Planner output: the updated context plus what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnPlan {
    pub context: ConversationContext,
    /// `None` when the turn answered an assessment question.
    pub classification: Option<IntentClassification>,
    pub action: PlannedAction,
    pub escalation: Option<EscalationDecision>,
}

impl TurnPlan {
    pub fn assessment_result(&self) -> Option<&AssessmentResult> {
        match &self.action {
            PlannedAction::AssessmentComplete(result) => Some(result),
            _ => None,
        }
    }
}

pub struct ConversationPlanner {
    classifier: IntentClassifier,
    engine: AssessmentEngine,
    rule_table: Arc<TriageRuleTable>,
    policy: EscalationPolicy,
}

impl ConversationPlanner {
    /// `rule_table` is shared with the assessment engine.
    pub fn new(rule_table: Arc<TriageRuleTable>, phrases: Arc<dyn PhraseSelector>) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            engine: AssessmentEngine::new(Arc::clone(&rule_table), phrases),
            rule_table,
            policy: EscalationPolicy::new(),
        }
    }

    pub fn rule_table(&self) -> &Arc<TriageRuleTable> {
        &self.rule_table
    }

    /// Plans one turn.
    ///
    /// # Errors
    ///
    /// - `AssessmentError` if the stored assessment state violates the protocol
    pub fn plan(
        &self,
        mut context: ConversationContext,
        text: &str,
        language: &Language,
        now: Timestamp,
    ) -> Result<TurnPlan, AssessmentError> {
        let (classification, action) = match context.clear_assessment() {
            Some(state) => {
                let action = match self.engine.advance(state, text, language)? {
                    AssessmentStep::Question { state, text } => {
                        let step_index = state.step_index();
                        context.set_assessment(state);
                        PlannedAction::Question { text, step_index }
                    }
                    AssessmentStep::Complete(result) => PlannedAction::AssessmentComplete(result),
                };
                (None, action)
            }
            None => {
                let classification = self.classifier.classify(text, language);
                context.record_classification(text, &classification, now);
                let action = self.route(&mut context, &classification, text, language);
                (Some(classification), action)
            }
        };

        let result = match &action {
            PlannedAction::AssessmentComplete(result) => Some(result),
            _ => None,
        };
        let escalation = self
            .policy
            .decide(&context, classification.as_ref(), text, result);

        Ok(TurnPlan {
            context,
            classification,
            action,
            escalation,
        })
    }

    fn route(
        &self,
        context: &mut ConversationContext,
        classification: &IntentClassification,
        text: &str,
        language: &Language,
    ) -> PlannedAction {
        let detected = self.rule_table.detect_symptom(text);
        let wants_assessment = classification.intent == Intent::SymptomCheck
            || (detected.is_some() && classification.intent != Intent::Goodbye);

        if wants_assessment {
            let (state, question) = self
                .engine
                .start(detected.unwrap_or(UNSPECIFIED_SYMPTOM), language);
            context.set_assessment(state);
            return PlannedAction::Question {
                text: question,
                step_index: 0,
            };
        }

        PlannedAction::Reply {
            intent: classification.intent,
            entities: classification.entities.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{AssessmentState, FixedPhraseSelector};
    use crate::domain::escalation::{EscalationReason, Priority};
    use crate::domain::triage::Severity;

    fn planner() -> ConversationPlanner {
        ConversationPlanner::new(
            Arc::new(TriageRuleTable::standard()),
            Arc::new(FixedPhraseSelector(0)),
        )
    }

    fn plan(ctx: ConversationContext, text: &str) -> TurnPlan {
        planner()
            .plan(ctx, text, &Language::english(), Timestamp::now())
            .unwrap()
    }

    #[test]
    fn greeting_goes_to_reply_generator() {
        let plan = plan(ConversationContext::new(), "hi");
        assert_eq!(
            plan.action,
            PlannedAction::Reply {
                intent: Intent::Greeting,
                entities: vec![]
            }
        );
        assert_eq!(plan.context.query_count(), 1);
        assert!(plan.escalation.is_none());
    }

    #[test]
    fn fever_starts_assessment_with_first_question_only() {
        let plan = plan(ConversationContext::new(), "I have fever");
        assert_eq!(
            plan.action,
            PlannedAction::Question {
                text: "What is your current body temperature?".into(),
                step_index: 0
            }
        );
        let state = plan.context.assessment().unwrap();
        assert_eq!(state.symptom(), "fever");
        assert_eq!(state.step_index(), 0);
    }

    #[test]
    fn symptom_keyword_alone_starts_assessment() {
        // "what is" + nothing else scores HealthEducation at 0.5, but the
        // rule table still spots the symptom.
        let plan = plan(ConversationContext::new(), "what is diarrhoea");
        assert!(matches!(plan.action, PlannedAction::Question { step_index: 0, .. }));
        assert_eq!(plan.context.assessment().unwrap().symptom(), "diarrhea");
    }

    #[test]
    fn goodbye_mentioning_symptom_does_not_start_assessment() {
        let plan = plan(ConversationContext::new(), "fever gone, thank you, bye");
        assert!(matches!(
            plan.action,
            PlannedAction::Reply {
                intent: Intent::Goodbye,
                ..
            }
        ));
    }

    #[test]
    fn active_assessment_skips_classification() {
        let first = plan(ConversationContext::new(), "I have fever");
        let second = plan(first.context, "hello 38");
        assert!(second.classification.is_none());
        assert_eq!(second.context.assessment().unwrap().step_index(), 1);
        assert_eq!(second.context.query_count(), 1);
    }

    #[test]
    fn only_one_assessment_is_ever_active() {
        let first = plan(ConversationContext::new(), "I have fever");
        // A second symptom mid-protocol is just an answer.
        let second = plan(first.context, "I also have a cough");
        let state = second.context.assessment().unwrap();
        assert_eq!(state.symptom(), "fever");
        assert_eq!(state.step_index(), 1);
    }

    #[test]
    fn full_protocol_with_breathing_trouble_escalates_urgently() {
        let mut ctx = plan(ConversationContext::new(), "I have fever").context;
        for answer in ["39", "3 days", "headache", "paracetamol"] {
            ctx = plan(ctx, answer).context;
        }
        let last = plan(ctx, "it's severe and I can't breathe");

        let result = last.assessment_result().unwrap();
        assert_eq!(result.severity, Severity::Severe);
        assert!(!last.context.has_active_assessment());
        assert_eq!(
            last.escalation,
            Some(EscalationDecision::new(
                EscalationReason::ExplicitEmergencyKeyword,
                Priority::Urgent
            ))
        );
    }

    #[test]
    fn severe_assessment_without_emergency_words_escalates_high() {
        let mut ctx = plan(ConversationContext::new(), "I have a cough").context;
        for answer in ["38", "5 days", "worst cough ever", "none"] {
            ctx = plan(ctx, answer).context;
        }
        let last = plan(ctx, "no");
        assert_eq!(
            last.escalation.map(|d| d.reason),
            Some(EscalationReason::CriticalSeverityAssessment)
        );
    }

    #[test]
    fn three_nonsense_turns_escalate() {
        let mut ctx = ConversationContext::new();
        let mut last = None;
        for _ in 0..3 {
            let p = plan(ctx, "xyzzy nonsense");
            ctx = p.context.clone();
            last = Some(p);
        }
        assert_eq!(
            last.unwrap().escalation.map(|d| d.reason),
            Some(EscalationReason::RepeatedUnresolvedIntent)
        );
    }

    #[test]
    fn corrupted_assessment_is_reported() {
        let mut ctx = ConversationContext::new();
        ctx.set_assessment(AssessmentState::reconstitute("fever".into(), 9, vec![]));
        let err = planner()
            .plan(ctx, "x", &Language::english(), Timestamp::now())
            .unwrap_err();
        assert_eq!(err, AssessmentError::StepOutOfRange { step_index: 9 });
    }
}
