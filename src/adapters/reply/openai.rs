//! OpenAI-compatible reply generator.
//!
//! Phrases replies for non-assessment turns through a chat completions
//! endpoint. The output is display text only.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIReplyConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let generator = OpenAIReplyGenerator::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::Language;
use crate::ports::{ReplyError, ReplyGenerator, ReplyRequest};

const SYSTEM_PROMPT: &str = "You are a friendly community health assistant. \
Answer in at most three short sentences in plain language. \
Never diagnose and never name medicines or doses. \
If the situation sounds dangerous, tell the user to visit a health centre.";

/// Configuration for the OpenAI reply generator.
#[derive(Debug, Clone)]
pub struct OpenAIReplyConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl OpenAIReplyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(8),
            max_tokens: 200,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct OpenAIReplyGenerator {
    config: OpenAIReplyConfig,
    client: Client,
}

impl OpenAIReplyGenerator {
    pub fn new(config: OpenAIReplyConfig) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReplyError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, request: &ReplyRequest) -> ChatRequest {
        let language = match request.language.as_str() {
            Language::HINDI => "Hindi",
            _ => "English",
        };
        let mut hint = format!("Detected intent: {}.", request.intent);
        for entity in &request.entities {
            hint.push_str(&format!(" {}: {}.", entity.name.as_str(), entity.value));
        }

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: format!("{} Reply in {}. {}", SYSTEM_PROMPT, language, hint),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user_text.clone(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: 0.3,
        }
    }

    async fn handle_response_status(response: Response) -> Result<Response, ReplyError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status.as_u16(), &body))
    }
}

fn error_for_status(status: u16, body: &str) -> ReplyError {
    match status {
        429 => ReplyError::RateLimited,
        400..=499 => ReplyError::InvalidResponse(format!("Status {}: {}", status, body)),
        _ => ReplyError::Unavailable(format!("Status {}: {}", status, body)),
    }
}

fn first_choice_text(response: ChatResponse) -> Result<String, ReplyError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ReplyError::InvalidResponse("No reply text in response".into()))
}

#[async_trait]
impl ReplyGenerator for OpenAIReplyGenerator {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, ReplyError> {
        let body = self.to_openai_request(request);

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReplyError::Timeout
                } else {
                    ReplyError::Unavailable(e.to_string())
                }
            })?;

        let response = Self::handle_response_status(response).await?;
        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReplyError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        first_choice_text(parsed)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
