//! HTTP handlers for triage endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    ErrorResponse, HealthResponse, MessageRequest, MessageResponse, SessionResponse,
    WorkerReleaseResponse,
};
use super::signature::{WebhookError, WhatsAppSignatureVerifier, SIGNATURE_HEADER};
use crate::application::handlers::conversation::{HandleMessageCommand, HandleMessageHandler};
use crate::application::handlers::session::{GetSessionHandler, GetSessionQuery};
use crate::domain::foundation::{DomainError, ErrorCode, Platform, UserId, WorkerId};
use crate::domain::messaging::InboundMessage;
use crate::ports::HealthWorkerDispatch;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for triage handlers.
#[derive(Clone)]
pub struct TriageHandlers {
    pub message_handler: Arc<HandleMessageHandler>,
    pub get_session_handler: Arc<GetSessionHandler>,
    pub whatsapp_verifier: Option<Arc<WhatsAppSignatureVerifier>>,
    pub dispatch: Option<Arc<dyn HealthWorkerDispatch>>,
}

impl TriageHandlers {
    pub fn new(
        message_handler: Arc<HandleMessageHandler>,
        get_session_handler: Arc<GetSessionHandler>,
    ) -> Self {
        Self {
            message_handler,
            get_session_handler,
            whatsapp_verifier: None,
            dispatch: None,
        }
    }

    /// Enables the worker release endpoint.
    pub fn with_dispatch(mut self, dispatch: Arc<dyn HealthWorkerDispatch>) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Requires a valid `X-Hub-Signature-256` on WhatsApp webhooks.
    pub fn with_whatsapp_secret(mut self, secret: impl Into<String>) -> Self {
        self.whatsapp_verifier = Some(Arc::new(WhatsAppSignatureVerifier::new(secret)));
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Message handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/messages - Process one message from any channel
pub async fn post_message(
    State(handlers): State<TriageHandlers>,
    Json(req): Json<MessageRequest>,
) -> Response {
    match req.into_inbound() {
        Ok(message) => run_turn(&handlers, message).await,
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::from(&DomainError::from(e))),
        )
            .into_response(),
    }
}

/// POST /api/webhooks/whatsapp - Signed message relay from WhatsApp
pub async fn whatsapp_webhook(
    State(handlers): State<TriageHandlers>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(verifier) = &handlers.whatsapp_verifier {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if let Err(e) = verifier.verify(&body, signature) {
            tracing::warn!(error = %e, "Rejected WhatsApp webhook");
            return handle_webhook_error(e);
        }
    }

    let mut req: MessageRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => return handle_webhook_error(WebhookError::InvalidPayload(e.to_string())),
    };
    req.platform = Platform::Whatsapp.as_str().to_string();

    match req.into_inbound() {
        Ok(message) => run_turn(&handlers, message).await,
        Err(e) => handle_webhook_error(WebhookError::InvalidPayload(e.to_string())),
    }
}

async fn run_turn(handlers: &TriageHandlers, message: InboundMessage) -> Response {
    let result = handlers
        .message_handler
        .handle(HandleMessageCommand { message })
        .await;
    let response = MessageResponse::from(&result);

    match &result.persistence_error {
        None => (StatusCode::OK, Json(response)).into_response(),
        Some(e) => {
            tracing::warn!(
                session_id = %result.session_id,
                error = %e,
                "Turn replied but not persisted"
            );
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Query handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/sessions/:platform/:user_id - Latest session for a channel user
pub async fn get_session(
    State(handlers): State<TriageHandlers>,
    Path((platform, user_id)): Path<(String, String)>,
) -> Response {
    let platform = match platform.parse::<Platform>() {
        Ok(p) => p,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };
    let user_id = match UserId::new(user_id) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    let query = GetSessionQuery { user_id, platform };
    match handlers.get_session_handler.handle(query).await {
        Ok(session) => (StatusCode::OK, Json(SessionResponse::from(&session))).into_response(),
        Err(e) => handle_domain_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Worker handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/workers/:worker_id/release - Worker closed their case
pub async fn release_worker(
    State(handlers): State<TriageHandlers>,
    Path(worker_id): Path<String>,
) -> Response {
    let worker_id = match WorkerId::new(worker_id) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response()
        }
    };

    let released = match &handlers.dispatch {
        Some(dispatch) => dispatch.release(&worker_id).await,
        None => Ok(false),
    };

    match released {
        Ok(true) => (
            StatusCode::OK,
            Json(WorkerReleaseResponse {
                worker_id: worker_id.to_string(),
                released: true,
            }),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("Unknown worker {}", worker_id))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(worker_id = %worker_id, error = %e, "Worker release failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::unavailable(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /health - Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_domain_error(error: DomainError) -> Response {
    let status = match error.code {
        ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::SessionNotFound => StatusCode::NOT_FOUND,
        ErrorCode::DatabaseError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InvalidStateTransition
        | ErrorCode::SessionClosed
        | ErrorCode::AssessmentProtocolViolation
        | ErrorCode::DispatchUnavailable
        | ErrorCode::ReplyGenerationFailed
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }
    (status, Json(ErrorResponse::from(&error))).into_response()
}

fn handle_webhook_error(error: WebhookError) -> Response {
    let status = error.status_code();
    let body = if status == StatusCode::UNAUTHORIZED {
        ErrorResponse::unauthorized(error.to_string())
    } else {
        ErrorResponse::bad_request(error.to_string())
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_not_found_maps_to_404() {
        let error = DomainError::new(ErrorCode::SessionNotFound, "none");
        assert_eq!(handle_domain_error(error).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_maps_to_503() {
        let error = DomainError::database("down");
        assert_eq!(
            handle_domain_error(error).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn validation_error_maps_to_400() {
        let error = DomainError::validation("platform", "unknown");
        assert_eq!(handle_domain_error(error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn signature_errors_map_to_401() {
        let response = handle_webhook_error(WebhookError::MissingSignature);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn payload_errors_map_to_400() {
        let response = handle_webhook_error(WebhookError::InvalidPayload("eof".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
