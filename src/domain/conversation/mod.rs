//! Conversation planning: pure per-turn composition of classifier,
//! assessment engine, rule table and escalation policy.

mod planner;

pub use planner::{ConversationPlanner, PlannedAction, TurnPlan};
