//! HTTP routes for triage endpoints.

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{
    get_session, health, post_message, release_worker, whatsapp_webhook, TriageHandlers,
};

/// Creates the triage router with all endpoints.
pub fn triage_routes(handlers: TriageHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/messages", post(post_message))
        .route("/api/webhooks/whatsapp", post(whatsapp_webhook))
        .route("/api/sessions/:platform/:user_id", get(get_session))
        .route("/api/workers/:worker_id/release", post(release_worker))
        .with_state(handlers)
}

/// Triage routes wrapped with tracing, CORS, a request timeout and a
/// body size limit.
///
/// An empty origin list allows any origin.
pub fn app_router(
    handlers: TriageHandlers,
    cors_origins: &[String],
    request_timeout: Duration,
    max_body_bytes: usize,
) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    triage_routes(handlers)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
