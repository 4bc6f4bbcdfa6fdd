//! Symptom assessment engine.
//!
//! Pure transitions over the five-question protocol. Severity is taken from
//! the shared rule table, keyed by the detected symptom and scanned across
//! every answer; the questionnaire itself only collects data for the record.

use std::sync::Arc;

use crate::domain::foundation::Language;
use crate::domain::triage::{Severity, TriageRuleTable};

use super::protocol::{acknowledgements, question, QUESTION_COUNT};
use super::{AssessmentError, AssessmentResult, AssessmentState, PhraseSelector};

/// Outcome of feeding one answer to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentStep {
    /// Protocol continues; `text` is the acknowledgement plus next question.
    Question { state: AssessmentState, text: String },
    /// All five answers collected.
    Complete(AssessmentResult),
}

pub struct AssessmentEngine {
    rule_table: Arc<TriageRuleTable>,
    phrases: Arc<dyn PhraseSelector>,
}

impl AssessmentEngine {
    pub fn new(rule_table: Arc<TriageRuleTable>, phrases: Arc<dyn PhraseSelector>) -> Self {
        Self {
            rule_table,
            phrases,
        }
    }

    /// Begins the protocol. The returned text is the first question alone.
    pub fn start(&self, symptom: &str, language: &Language) -> (AssessmentState, String) {
        let first = question(0, language).unwrap_or_default();
        (AssessmentState::begin(symptom), first.to_string())
    }

    /// Records `answer` and moves one step forward.
    pub fn advance(
        &self,
        mut state: AssessmentState,
        answer: &str,
        language: &Language,
    ) -> Result<AssessmentStep, AssessmentError> {
        Self::check_protocol(&state)?;

        state.record(answer.trim().to_string());

        match question(state.step_index(), language) {
            Some(next) => {
                let acks = acknowledgements(language);
                let ack = acks[self.phrases.select(acks.len()) % acks.len()];
                Ok(AssessmentStep::Question {
                    state,
                    text: format!("{} {}", ack, next),
                })
            }
            None => Ok(AssessmentStep::Complete(self.finish(state, language))),
        }
    }

    fn check_protocol(state: &AssessmentState) -> Result<(), AssessmentError> {
        let step_index = state.step_index();
        if step_index >= QUESTION_COUNT {
            return Err(AssessmentError::StepOutOfRange { step_index });
        }
        if state.responses().len() != step_index {
            return Err(AssessmentError::ResponsesOutOfSync {
                step_index,
                responses: state.responses().len(),
            });
        }
        Ok(())
    }

    fn finish(&self, state: AssessmentState, language: &Language) -> AssessmentResult {
        let (symptom, responses) = state.into_responses();
        let outcome = self
            .rule_table
            .evaluate(&symptom, responses.iter().map(String::as_str));

        let summary_text = summary(
            language,
            &outcome.symptom,
            outcome.severity,
            &outcome.condition,
            &outcome.recommendation.text,
        );

        AssessmentResult {
            symptom: outcome.symptom,
            responses,
            severity: outcome.severity,
            condition: outcome.condition,
            recommended_action: outcome.recommendation.action,
            summary_text,
        }
    }
}

fn summary(
    language: &Language,
    symptom: &str,
    severity: Severity,
    condition: &str,
    advice: &str,
) -> String {
    match language.as_str() {
        Language::HINDI => format!(
            "सभी सवालों के जवाब देने के लिए धन्यवाद। आपके लक्षण ({}) {} लगते हैं और यह {} हो सकता है। {} यह निदान नहीं है।",
            symptom, severity, condition, advice
        ),
        _ => format!(
            "Thank you for answering all the questions. Your {} appears {} and may indicate {}. {} This is not a diagnosis.",
            symptom, severity, condition, advice
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::FixedPhraseSelector;
    use crate::domain::triage::{RecommendedAction, UNSPECIFIED_SYMPTOM};
    use proptest::prelude::*;

    fn engine() -> AssessmentEngine {
        AssessmentEngine::new(
            Arc::new(TriageRuleTable::standard()),
            Arc::new(FixedPhraseSelector(0)),
        )
    }

    fn run(engine: &AssessmentEngine, symptom: &str, answers: &[&str]) -> AssessmentStep {
        let en = Language::english();
        let (mut state, _) = engine.start(symptom, &en);
        let mut last = None;
        for answer in answers {
            let step = engine.advance(state.clone(), answer, &en).unwrap();
            if let AssessmentStep::Question { state: next, .. } = &step {
                state = next.clone();
            }
            last = Some(step);
        }
        last.expect("at least one answer")
    }

    #[test]
    fn start_returns_first_question_only() {
        let (state, text) = engine().start("fever", &Language::english());
        assert_eq!(text, "What is your current body temperature?");
        assert_eq!(state.symptom(), "fever");
        assert_eq!(state.step_index(), 0);
        assert!(state.responses().is_empty());
    }

    #[test]
    fn advance_prefixes_acknowledgement() {
        let engine = engine();
        let (state, _) = engine.start("fever", &Language::english());
        match engine.advance(state, "38.5", &Language::english()).unwrap() {
            AssessmentStep::Question { state, text } => {
                assert_eq!(text, "Thank you. How many days have you had these symptoms?");
                assert_eq!(state.step_index(), 1);
                assert_eq!(state.responses(), ["38.5".to_string()]);
            }
            other => panic!("Expected question, got {:?}", other),
        }
    }

    #[test]
    fn fifth_answer_completes_with_rule_table_severity() {
        let step = run(
            &engine(),
            "fever",
            &["39", "3 days", "headache", "paracetamol", "it's severe and I can't breathe"],
        );
        match step {
            AssessmentStep::Complete(result) => {
                assert_eq!(result.symptom, "fever");
                assert_eq!(result.responses.len(), 5);
                assert_eq!(result.severity, Severity::Severe);
                assert_eq!(result.recommended_action, RecommendedAction::SeekUrgentCare);
                assert!(result.summary_text.contains("fever"));
            }
            other => panic!("Expected completion, got {:?}", other),
        }
    }

    #[test]
    fn mild_answers_produce_self_care() {
        match run(&engine(), "cough", &["37", "2", "no", "no", "no"]) {
            AssessmentStep::Complete(result) => {
                assert_eq!(result.severity, Severity::Mild);
                assert_eq!(result.recommended_action, RecommendedAction::SelfCare);
            }
            other => panic!("Expected completion, got {:?}", other),
        }
    }

    #[test]
    fn unknown_symptom_still_completes() {
        match run(&engine(), "tingling toes", &["a", "b", "c", "d", "e"]) {
            AssessmentStep::Complete(result) => {
                assert_eq!(result.symptom, UNSPECIFIED_SYMPTOM);
                assert_eq!(result.recommended_action, RecommendedAction::VisitClinic);
            }
            other => panic!("Expected completion, got {:?}", other),
        }
    }

    #[test]
    fn step_out_of_range_is_a_protocol_violation() {
        let state = AssessmentState::reconstitute("fever".into(), 5, vec!["x".into(); 5]);
        assert_eq!(
            engine().advance(state, "more", &Language::english()),
            Err(AssessmentError::StepOutOfRange { step_index: 5 })
        );
    }

    #[test]
    fn desynchronised_responses_are_a_protocol_violation() {
        let state = AssessmentState::reconstitute("fever".into(), 2, vec!["x".into()]);
        assert_eq!(
            engine().advance(state, "more", &Language::english()),
            Err(AssessmentError::ResponsesOutOfSync {
                step_index: 2,
                responses: 1
            })
        );
    }

    #[test]
    fn hindi_questions_are_used_for_hindi() {
        let (_, text) = engine().start("fever", &Language::hindi());
        assert_eq!(text, "आपके शरीर का तापमान अभी कितना है?");
    }

    proptest! {
        #[test]
        fn protocol_is_deterministic_with_fixed_selector(
            answers in proptest::collection::vec("[a-z0-9 ]{1,20}", 5)
        ) {
            let refs: Vec<&str> = answers.iter().map(String::as_str).collect();
            let first = run(&engine(), "fever", &refs);
            let second = run(&engine(), "fever", &refs);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn each_answer_advances_exactly_one_step(count in 1usize..5) {
            let engine = engine();
            let en = Language::english();
            let (mut state, _) = engine.start("cold", &en);
            for i in 0..count {
                match engine.advance(state.clone(), "answer", &en).unwrap() {
                    AssessmentStep::Question { state: next, .. } => {
                        prop_assert_eq!(next.step_index(), i + 1);
                        prop_assert_eq!(next.responses().len(), i + 1);
                        state = next;
                    }
                    AssessmentStep::Complete(_) => prop_assert!(false, "completed early"),
                }
            }
        }
    }
}
