//! Bank-aggregator webhook signature verification
//!
//! Casso V2 scheme: the `X-Casso-Signature` header carries
//! `t=<unixms>,v1=<hex hmac-sha512>`; the signed message is the timestamp
//! joined with a canonical JSON rendering of the payload (all object keys
//! sorted recursively, compact separators, non-ASCII emitted literally).

use hmac::{Hmac, Mac};
use serde_json::{Map, Value};
use sha2::Sha512;
use tracing::warn;

type HmacSha512 = Hmac<Sha512>;

/// Verifies inbound webhook notifications
pub struct WebhookVerifier;

impl WebhookVerifier {
    /// Verify a payload against its signature header
    ///
    /// Returns false on any malformed input; never errors. The hex digest
    /// comparison is constant-time via the Mac verification.
    pub fn verify(payload: &Value, signature_header: &str, secret: &str) -> bool {
        if signature_header.is_empty() {
            warn!("Missing webhook signature header");
            return false;
        }

        let mut timestamp = None;
        let mut received_signature = None;
        for part in signature_header.split(',') {
            let Some((key, value)) = part.split_once('=') else {
                warn!("Malformed webhook signature header");
                return false;
            };
            match key {
                "t" => timestamp = Some(value),
                "v1" => received_signature = Some(value),
                _ => {}
            }
        }

        let (Some(timestamp), Some(received_signature)) = (timestamp, received_signature) else {
            warn!("Missing timestamp or signature in webhook header");
            return false;
        };
        if timestamp.is_empty() || received_signature.is_empty() {
            warn!("Empty timestamp or signature in webhook header");
            return false;
        }

        let canonical = canonicalize(payload);
        let json_string = match serde_json::to_string(&canonical) {
            Ok(s) => s,
            Err(_) => return false,
        };

        let signed_payload = format!("{}.{}", timestamp, json_string);

        let Ok(mut mac) = HmacSha512::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(signed_payload.as_bytes());

        let Ok(signature_bytes) = hex::decode(received_signature) else {
            warn!("Webhook signature is not valid hex");
            return false;
        };

        mac.verify_slice(&signature_bytes).is_ok()
    }
}

/// Rebuild a JSON value with every object's keys sorted ascending
///
/// Arrays keep their element order; each element recurses.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
