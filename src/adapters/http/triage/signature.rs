//! WhatsApp webhook signature verification.
//!
//! Meta signs every webhook body with the app secret using HMAC-SHA256 and
//! sends the hex digest as `X-Hub-Signature-256: sha256=<hex>`.

use axum::http::StatusCode;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Errors raised while accepting a channel webhook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("Missing signature header")]
    MissingSignature,

    #[error("Malformed signature: {0}")]
    MalformedSignature(&'static str),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

impl WebhookError {
    /// Signature problems are 401 so the sender does not keep retrying a
    /// forged request; a bad body is the sender's bug.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::MalformedSignature(_)
            | WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Verifies `X-Hub-Signature-256` against the configured app secret.
pub struct WhatsAppSignatureVerifier {
    secret: Secret<String>,
}

impl WhatsAppSignatureVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
        }
    }

    /// Checks the header value against the raw request body.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - no header
    /// - `MalformedSignature` - wrong prefix or non-hex digest
    /// - `InvalidSignature` - digest mismatch
    pub fn verify(&self, payload: &[u8], header: Option<&str>) -> Result<(), WebhookError> {
        let header = header.ok_or(WebhookError::MissingSignature)?;
        let digest = header
            .trim()
            .strip_prefix(SIGNATURE_PREFIX)
            .ok_or(WebhookError::MalformedSignature("expected sha256= prefix"))?;
        let provided = hex::decode(digest)
            .map_err(|_| WebhookError::MalformedSignature("digest is not hex"))?;

        let expected = self.compute(payload)?;
        if expected.len() == provided.len() && bool::from(expected.ct_eq(&provided)) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }

    /// Header value for a payload, as the sender would produce it.
    pub fn sign(&self, payload: &[u8]) -> Result<String, WebhookError> {
        Ok(format!("{}{}", SIGNATURE_PREFIX, hex::encode(self.compute(payload)?)))
    }

    fn compute(&self, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
