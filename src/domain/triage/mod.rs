//! Triage rule table: symptom -> severity -> condition and advice.

mod rule_table;
mod values;

pub use rule_table::{SymptomRule, TriageRuleTable, UNSPECIFIED_SYMPTOM};
pub use values::{BySeverity, Recommendation, RecommendedAction, Severity, TriageOutcome};
