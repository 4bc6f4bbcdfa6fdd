//! Intent classification.
//!
//! Maps a single utterance to an [`Intent`] with a confidence score and any
//! age, gender or duration entities found in it. Pure and stateless.

mod classifier;
mod entities;
mod patterns;
mod values;

pub use classifier::{IntentClassifier, CONFIDENCE_FLOOR, UNKNOWN_LANGUAGE_PENALTY};
pub use entities::extract_entities;
pub use values::{Entity, EntityKind, Intent, IntentClassification, Span};
