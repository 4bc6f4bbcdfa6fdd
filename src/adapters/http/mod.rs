//! HTTP adapters - axum routers for the channel webhooks and session view.

pub mod triage;

pub use triage::{app_router, triage_routes, TriageHandlers};
