//! AEAD envelope for payment-request tokens
//!
//! The originating service seals the request payload into an opaque
//! base64url string; the bridge opens it. AES-256-GCM gives both
//! confidentiality and tamper detection, so any corruption or key mismatch
//! fails at the tag check before the payload is ever parsed.

use crate::domain::token::PaymentRequestData;
use crate::shared::error::{AppError, AppResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

const NONCE_LEN: usize = 12;

/// Seals and opens payment-request tokens
pub struct TokenEnvelope {
    cipher: Aes256Gcm,
}

impl TokenEnvelope {
    /// Derive the fixed-length AEAD key from the process secret
    pub fn new(secret: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        Self { cipher: Aes256Gcm::new((&key).into()) }
    }

    /// Seal a payment request into an opaque token
    ///
    /// Not needed by the bridge at runtime; used by the token tool and by
    /// tests to generate requests the way the originating service does.
    pub fn seal(&self, data: &PaymentRequestData) -> AppResult<String> {
        let plaintext = serde_json::to_vec(data)
            .map_err(|e| AppError::Internal(format!("serialize token payload: {}", e)))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_ref())
            .map_err(|_| AppError::Internal("token encryption failed".to_string()))?;

        let mut raw = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        raw.extend_from_slice(&nonce_bytes);
        raw.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Open a token, authenticating and decrypting its payload
    ///
    /// Any decoding, authentication or parse failure maps to `InvalidToken`;
    /// a well-formed payload whose `expired_at` has passed maps to
    /// `TokenExpired`. The raw token is never logged.
    pub fn open(&self, token: &str) -> AppResult<PaymentRequestData> {
        let raw = URL_SAFE_NO_PAD
            .decode(token.trim_end_matches('='))
            .map_err(|_| AppError::InvalidToken("malformed base64".to_string()))?;

        if raw.len() <= NONCE_LEN {
            return Err(AppError::InvalidToken("token too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| AppError::InvalidToken("authentication failed".to_string()))?;

        let data: PaymentRequestData = serde_json::from_slice(&plaintext)
            .map_err(|_| AppError::InvalidToken("malformed payload".to_string()))?;

        // Open-time expiry is separate from session expiry; both are enforced
        if data.expired_at < Utc::now().timestamp() {
            warn!(order_id = %data.order_id, "Payment request token expired");
            return Err(AppError::TokenExpired);
        }

        info!(order_id = %data.order_id, "Opened payment request token");
        Ok(data)
    }
}
