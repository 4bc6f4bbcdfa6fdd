//! Escalation decision values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a conversation is handed to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationReason {
    ExplicitEmergencyKeyword,
    CriticalSeverityAssessment,
    RepeatedUnresolvedIntent,
    UserRequestedHuman,
}

impl EscalationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationReason::ExplicitEmergencyKeyword => "explicit_emergency_keyword",
            EscalationReason::CriticalSeverityAssessment => "critical_severity_assessment",
            EscalationReason::RepeatedUnresolvedIntent => "repeated_unresolved_intent",
            EscalationReason::UserRequestedHuman => "user_requested_human",
        }
    }
}

impl fmt::Display for EscalationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dispatch urgency, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A positive escalation decision. Absence (`None`) means no escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationDecision {
    pub reason: EscalationReason,
    pub priority: Priority,
}

impl EscalationDecision {
    pub fn new(reason: EscalationReason, priority: Priority) -> Self {
        Self { reason, priority }
    }
}
