//! HTTP adapter for the triage conversation endpoints.

mod dto;
mod handlers;
mod routes;
mod signature;

pub use dto::{
    ButtonResponse, ErrorResponse, EscalationResponse, HealthResponse, MessageRequest,
    MessageResponse, SessionResponse, TurnResponse, WorkerReleaseResponse,
};
pub use handlers::TriageHandlers;
pub use routes::{app_router, triage_routes};
pub use signature::{WebhookError, WhatsAppSignatureVerifier, SIGNATURE_HEADER};
