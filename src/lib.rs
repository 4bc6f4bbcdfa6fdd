//! Health Triage - multi-channel symptom triage conversation engine.
//!
//! Classifies free-text health messages, walks users through a short
//! symptom assessment, and hands severe or emergency cases to a community
//! health worker or the emergency hotline.
//!
//! # Layers
//!
//! - `domain` - Classifier, assessment protocol, rule table, escalation
//!   policy, session aggregate and per-turn planner
//! - `ports` - Contracts for persistence, dispatch, replies, channels and
//!   analytics
//! - `application` - Conversation orchestrator, session store, sweep and
//!   outbound delivery
//! - `adapters` - In-memory stores, roster, reply generators, HTTP routes
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
