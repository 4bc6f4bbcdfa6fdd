//! HTTP integration tests for the triage router.
//!
//! Exercises the axum routes with `tower::ServiceExt::oneshot` against the
//! in-memory adapters.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use health_triage::adapters::dispatch::WorkerRoster;
use health_triage::adapters::events::{InMemoryEventBus, PublishingAnalyticsSink};
use health_triage::adapters::http::triage::{WhatsAppSignatureVerifier, SIGNATURE_HEADER};
use health_triage::adapters::http::{app_router, triage_routes, TriageHandlers};
use health_triage::adapters::records::InMemoryMedicalRecords;
use health_triage::adapters::reply::TemplateReplyGenerator;
use health_triage::adapters::storage::InMemorySessionRepository;
use health_triage::application::{GetSessionHandler, HandleMessageHandler, SessionStore};
use health_triage::domain::assessment::FixedPhraseSelector;
use health_triage::domain::conversation::ConversationPlanner;
use health_triage::domain::escalation::{EscalationReason, Priority};
use health_triage::domain::foundation::{DomainError, Platform, SessionId, Timestamp, UserId, WorkerId};
use health_triage::domain::session::Session;
use health_triage::domain::triage::TriageRuleTable;
use health_triage::ports::{HealthWorkerDispatch, SessionRepository, Worker};

// =============================================================================
// Test Infrastructure
// =============================================================================

const WHATSAPP_SECRET: &str = "test-app-secret";

/// Loads normally but refuses every save.
struct ReadOnlyRepository {
    inner: InMemorySessionRepository,
}

#[async_trait]
impl SessionRepository for ReadOnlyRepository {
    async fn load(
        &self,
        user_id: &UserId,
        platform: Platform,
    ) -> Result<Option<Session>, DomainError> {
        self.inner.load(user_id, platform).await
    }

    async fn save(&self, _session: &Session) -> Result<(), DomainError> {
        Err(DomainError::database("replica is read-only"))
    }

    async fn list_expired(&self, threshold: Timestamp) -> Result<Vec<Session>, DomainError> {
        self.inner.list_expired(threshold).await
    }
}

fn handlers(repository: Arc<dyn SessionRepository>) -> TriageHandlers {
    let message_handler = HandleMessageHandler::new(
        Arc::new(SessionStore::new(repository.clone())),
        Arc::new(ConversationPlanner::new(
            Arc::new(TriageRuleTable::standard()),
            Arc::new(FixedPhraseSelector(0)),
        )),
        Arc::new(TemplateReplyGenerator::new()),
        Arc::new(InMemoryMedicalRecords::new()),
        Arc::new(WorkerRoster::empty()),
        Arc::new(PublishingAnalyticsSink::new(Arc::new(InMemoryEventBus::new()))),
    );
    TriageHandlers::new(
        Arc::new(message_handler),
        Arc::new(GetSessionHandler::new(repository)),
    )
}

fn app() -> Router {
    triage_routes(handlers(Arc::new(InMemorySessionRepository::new())))
}

fn signed_app() -> Router {
    triage_routes(
        handlers(Arc::new(InMemorySessionRepository::new()))
            .with_whatsapp_secret(WHATSAPP_SECRET),
    )
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn greeting_returns_reply_with_buttons() {
    let (status, body) = send(
        &app(),
        post_json(
            "/api/messages",
            &json!({"userId": "web-1", "platform": "web", "text": "hi"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Hi, how are you? How can I help you today?");
    assert_eq!(body["buttons"].as_array().unwrap().len(), 3);
    assert_eq!(body["escalated"], false);
    assert_eq!(body["status"], "waiting");
    assert!(body.get("retryable").is_none());
}

#[tokio::test]
async fn blank_text_is_rejected() {
    let (status, body) = send(
        &app(),
        post_json(
            "/api/messages",
            &json!({"userId": "web-1", "platform": "web", "text": "   "}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn unknown_platform_is_rejected() {
    let (status, _) = send(
        &app(),
        post_json(
            "/api/messages",
            &json!({"userId": "web-1", "platform": "telegram", "text": "hi"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn session_view_shows_history() {
    let app = app();
    send(
        &app,
        post_json(
            "/api/messages",
            &json!({"userId": "+919800000001", "platform": "sms", "text": "I have fever"}),
        ),
    )
    .await;

    let (status, body) = send(&app, get("/api/sessions/sms/+919800000001")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["platform"], "sms");
    assert_eq!(body["status"], "waiting");
    assert_eq!(body["assessmentInProgress"], true);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");
    assert_eq!(history[1]["text"], "What is your current body temperature?");
}

#[tokio::test]
async fn missing_session_is_404() {
    let (status, body) = send(&app(), get("/api/sessions/web/nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn session_view_rejects_unknown_platform() {
    let (status, _) = send(&app(), get("/api/sessions/fax/u-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn emergency_reply_is_marked_escalated() {
    let (status, body) = send(
        &app(),
        post_json(
            "/api/messages",
            &json!({"userId": "web-9", "platform": "web", "text": "he is unconscious"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["escalated"], true);
    assert_eq!(body["status"], "completed");
    assert!(body["text"].as_str().unwrap().contains("108"));
}

#[tokio::test]
async fn release_route_frees_busy_worker() {
    let roster = Arc::new(WorkerRoster::new(vec![Worker {
        id: WorkerId::new("asha-1").unwrap(),
        name: "Sunita".to_string(),
        location: None,
        phone: None,
    }]));
    let worker = WorkerId::new("asha-1").unwrap();
    roster
        .notify(
            &worker,
            &SessionId::new(),
            EscalationReason::ExplicitEmergencyKeyword,
            Priority::Urgent,
        )
        .await
        .unwrap();
    let app = triage_routes(
        handlers(Arc::new(InMemorySessionRepository::new())).with_dispatch(roster.clone()),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/workers/asha-1/release")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workerId"], "asha-1");
    assert_eq!(body["released"], true);
    assert!(!roster.is_busy(&worker).await);
}

#[tokio::test]
async fn release_route_unknown_worker_is_404() {
    let app = triage_routes(
        handlers(Arc::new(InMemorySessionRepository::new()))
            .with_dispatch(Arc::new(WorkerRoster::empty())),
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/workers/nobody/release")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let app = app_router(
        handlers(Arc::new(InMemorySessionRepository::new())),
        &[],
        Duration::from_secs(5),
        1024,
    );
    let text = "a".repeat(4096);
    let response = app
        .oneshot(post_json(
            "/api/messages",
            &json!({"userId": "web-1", "platform": "web", "text": text}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn persistence_failure_returns_503_with_reply() {
    let app = triage_routes(handlers(Arc::new(ReadOnlyRepository {
        inner: InMemorySessionRepository::new(),
    })));

    let (status, body) = send(
        &app,
        post_json(
            "/api/messages",
            &json!({"userId": "web-1", "platform": "web", "text": "hi"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["text"], "Hi, how are you? How can I help you today?");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn whatsapp_webhook_without_secret_accepts_unsigned() {
    let app = app();
    let (status, _) = send(
        &app,
        post_json(
            "/api/webhooks/whatsapp",
            &json!({"userId": "+919800000002", "text": "hello"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api/sessions/whatsapp/+919800000002")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["platform"], "whatsapp");
}

#[tokio::test]
async fn whatsapp_webhook_rejects_unsigned_when_secret_set() {
    let (status, body) = send(
        &signed_app(),
        post_json(
            "/api/webhooks/whatsapp",
            &json!({"userId": "+919800000002", "text": "hello"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn whatsapp_webhook_accepts_valid_signature() {
    let payload = json!({"userId": "+919800000003", "text": "hello", "language": "en"}).to_string();
    let signature = WhatsAppSignatureVerifier::new(WHATSAPP_SECRET)
        .sign(payload.as_bytes())
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/whatsapp")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(payload))
        .unwrap();
    let (status, body) = send(&signed_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["escalated"], false);
}

#[tokio::test]
async fn whatsapp_webhook_rejects_wrong_signature() {
    let payload = json!({"userId": "+919800000003", "text": "hello"}).to_string();
    let signature = WhatsAppSignatureVerifier::new("someone-else")
        .sign(payload.as_bytes())
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/whatsapp")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(payload))
        .unwrap();
    let (status, _) = send(&signed_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whatsapp_webhook_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/whatsapp")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}
