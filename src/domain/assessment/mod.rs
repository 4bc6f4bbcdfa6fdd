//! Symptom assessment: a fixed five-question protocol.

mod engine;
mod errors;
mod phrases;
mod protocol;
mod state;

pub use engine::{AssessmentEngine, AssessmentStep};
pub use errors::AssessmentError;
pub use phrases::{FixedPhraseSelector, PhraseSelector, RandomPhraseSelector};
pub use protocol::{acknowledgements, question, QUESTION_COUNT};
pub use state::{AssessmentResult, AssessmentState};
