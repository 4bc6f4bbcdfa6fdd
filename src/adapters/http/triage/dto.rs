//! Request and response bodies for the triage endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::conversation::HandleMessageResult;
use crate::domain::escalation::{EscalationReason, Priority};
use crate::domain::foundation::{DomainError, Timestamp, ValidationError};
use crate::domain::intent::Intent;
use crate::domain::messaging::InboundMessage;
use crate::domain::session::{Role, Session, UserState};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Inbound message relayed by a channel gateway or the web widget.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub user_id: String,
    /// Required on the generic endpoint; the WhatsApp webhook sets it.
    #[serde(default)]
    pub platform: String,
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl MessageRequest {
    pub fn into_inbound(self) -> Result<InboundMessage, ValidationError> {
        InboundMessage::parse(
            &self.user_id,
            &self.platform,
            &self.text,
            self.language.as_deref(),
            self.location.as_deref(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ButtonResponse {
    pub payload: String,
    pub title: String,
}

/// Reply to one inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub session_id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ButtonResponse>,
    pub escalated: bool,
    pub status: String,
    /// Set when the turn could not be persisted; the channel should resend.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

impl From<&HandleMessageResult> for MessageResponse {
    fn from(result: &HandleMessageResult) -> Self {
        Self {
            session_id: result.session_id.to_string(),
            text: result.outbound.text.clone(),
            buttons: result
                .outbound
                .buttons
                .iter()
                .map(|b| ButtonResponse {
                    payload: b.payload.clone(),
                    title: b.title.clone(),
                })
                .collect(),
            escalated: result.outbound.escalated,
            status: result.status.as_str().to_string(),
            retryable: result
                .persistence_error
                .as_ref()
                .is_some_and(DomainError::is_retryable),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResponse {
    pub role: Role,
    pub text: String,
    pub at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationResponse {
    pub reason: EscalationReason,
    pub priority: Priority,
    pub assigned_worker: Option<String>,
    pub fallback: bool,
    pub escalated_at: Timestamp,
}

/// Session view for health-worker tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
    pub user_id: String,
    pub platform: String,
    pub status: String,
    pub language: String,
    pub location: Option<String>,
    pub user_state: UserState,
    pub current_intent: Option<Intent>,
    pub assessment_in_progress: bool,
    pub started_at: Timestamp,
    pub last_activity_at: Timestamp,
    pub ended_at: Option<Timestamp>,
    pub escalation: Option<EscalationResponse>,
    pub history: Vec<TurnResponse>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        let context = session.context();
        Self {
            session_id: session.id().to_string(),
            user_id: session.user_id().to_string(),
            platform: session.platform().as_str().to_string(),
            status: session.status().as_str().to_string(),
            language: session.language().as_str().to_string(),
            location: session.location().map(str::to_string),
            user_state: context.user_state(),
            current_intent: context.current_intent(),
            assessment_in_progress: context.has_active_assessment(),
            started_at: *session.started_at(),
            last_activity_at: *session.last_activity_at(),
            ended_at: session.ended_at().copied(),
            escalation: session.escalation().map(|e| EscalationResponse {
                reason: e.reason,
                priority: e.priority,
                assigned_worker: e.assigned_worker.as_ref().map(|w| w.to_string()),
                fallback: e.fallback,
                escalated_at: e.escalated_at,
            }),
            history: session
                .history()
                .iter()
                .map(|t| TurnResponse {
                    role: t.role,
                    text: t.text.clone(),
                    at: t.at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Result of handing a worker back to the roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerReleaseResponse {
    pub worker_id: String,
    pub released: bool,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: "DISPATCH_UNAVAILABLE".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        Self {
            code: error.code.to_string(),
            message: error.message.clone(),
            details: if error.details.is_empty() {
                None
            } else {
                serde_json::to_value(&error.details).ok()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, Language, Platform, UserId};

    #[test]
    fn message_request_deserializes_camel_case() {
        let req: MessageRequest = serde_json::from_str(
            r#"{"userId":"u-1","platform":"web","text":"hi","language":"hi"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, "u-1");
        assert_eq!(req.language.as_deref(), Some("hi"));
        assert!(req.location.is_none());
    }

    #[test]
    fn message_request_without_platform_fails_validation() {
        let req: MessageRequest =
            serde_json::from_str(r#"{"userId":"u-1","text":"hi"}"#).unwrap();
        assert!(matches!(
            req.into_inbound(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn message_request_converts_to_inbound() {
        let req = MessageRequest {
            user_id: "u-1".to_string(),
            platform: "sms".to_string(),
            text: "  I have fever ".to_string(),
            language: None,
            location: Some("Pune".to_string()),
        };
        let inbound = req.into_inbound().unwrap();
        assert_eq!(inbound.platform, Platform::Sms);
        assert_eq!(inbound.text, "I have fever");
        assert_eq!(inbound.location.as_deref(), Some("Pune"));
    }

    #[test]
    fn message_response_omits_empty_buttons_and_retryable() {
        let response = MessageResponse {
            session_id: "s".to_string(),
            text: "hello".to_string(),
            buttons: vec![],
            escalated: false,
            status: "waiting".to_string(),
            retryable: false,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("buttons").is_none());
        assert!(json.get("retryable").is_none());
        assert_eq!(json["sessionId"], "s");
    }

    #[test]
    fn session_response_reflects_session() {
        let session = Session::start(
            UserId::new("u-1").unwrap(),
            Platform::Whatsapp,
            Language::english(),
            Some("Nashik".to_string()),
            Timestamp::now(),
        );
        let view = SessionResponse::from(&session);
        assert_eq!(view.platform, "whatsapp");
        assert_eq!(view.location.as_deref(), Some("Nashik"));
        assert!(view.history.is_empty());
        assert!(view.escalation.is_none());
    }

    #[test]
    fn error_response_from_domain_error_keeps_code_and_details() {
        let error = DomainError::validation("text", "cannot be empty");
        let response = ErrorResponse::from(&error);
        assert_eq!(response.code, "VALIDATION_FAILED");
        assert_eq!(response.details.unwrap()["field"], "text");

        let bare = ErrorResponse::from(&DomainError::new(ErrorCode::InternalError, "boom"));
        assert!(bare.details.is_none());
    }
}
