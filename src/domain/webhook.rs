//! Bank-aggregator webhook payload models and order extraction

use crate::domain::session::MIN_ORDER_ID_DIGITS;
use crate::shared::error::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;

/// Top-level webhook envelope: `{"error": 0, "data": {...transaction...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default = "default_error_code")]
    pub error: i64,
    #[serde(default)]
    pub data: Option<Value>,
}

fn default_error_code() -> i64 {
    -1
}

impl WebhookEnvelope {
    /// Parse the envelope out of an already-decoded JSON payload
    pub fn parse(payload: &Value) -> AppResult<Self> {
        serde_json::from_value(payload.clone())
            .map_err(|e| AppError::MalformedWebhook(e.to_string()))
    }

    /// Extract the transaction record, rejecting aggregator-reported errors
    /// and empty payloads before any reconciliation happens
    pub fn transaction(&self) -> AppResult<WebhookTransaction> {
        if self.error != 0 {
            return Err(AppError::MalformedWebhook(format!(
                "aggregator error code {}",
                self.error
            )));
        }

        let data = match &self.data {
            Some(Value::Object(map)) if !map.is_empty() => map,
            _ => return Err(AppError::MalformedWebhook("no transaction data".to_string())),
        };

        // Transaction ids arrive as numbers or strings depending on the
        // aggregator version; normalize to string
        let id = match data.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(AppError::MalformedWebhook("missing transaction id".to_string())),
        };

        let amount = data
            .get("amount")
            .and_then(Value::as_i64)
            .ok_or_else(|| AppError::MalformedWebhook("missing or non-integer amount".to_string()))?;

        let description = data
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(WebhookTransaction { id, description, amount })
    }
}

/// A verified bank transaction reported by the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTransaction {
    pub id: String,
    pub description: String,
    pub amount: i64,
}

impl WebhookTransaction {
    /// Resolve the order id referenced by this transaction's description
    pub fn order_id(&self) -> AppResult<String> {
        extract_order_id(&self.description).ok_or(AppError::UnresolvableOrder)
    }
}

/// Find the order id in a transfer description
///
/// First whitespace-separated token that is purely ASCII digits and at
/// least MIN_ORDER_ID_DIGITS long wins. Tokens with punctuation attached
/// do not count.
pub fn extract_order_id(description: &str) -> Option<String> {
    description
        .split_whitespace()
        .find(|word| word.len() >= MIN_ORDER_ID_DIGITS && word.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_order_id_first_match_wins() {
        assert_eq!(
            extract_order_id("CK 1700000001 1800000002 thanh toan").as_deref(),
            Some("1700000001")
        );
    }

    #[test]
    fn test_extract_order_id_ignores_short_and_mixed_tokens() {
        assert_eq!(extract_order_id("don hang 12345"), None);
        assert_eq!(extract_order_id("ma1700000001 khong hop le"), None);
        assert_eq!(extract_order_id("(1700000001) trong ngoac"), None);
        assert_eq!(extract_order_id(""), None);
    }

    #[test]
    fn test_extract_order_id_exact_length_boundary() {
        assert_eq!(extract_order_id("x 1234567890 y").as_deref(), Some("1234567890"));
        assert_eq!(extract_order_id("x 123456789 y"), None);
    }

    #[test]
    fn test_envelope_rejects_error_code() {
        let payload = serde_json::json!({"error": 1, "data": {"id": 7, "amount": 1}});
        let envelope = WebhookEnvelope::parse(&payload).unwrap();
        assert!(matches!(envelope.transaction(), Err(AppError::MalformedWebhook(_))));
    }

    #[test]
    fn test_envelope_missing_error_defaults_to_failure() {
        let payload = serde_json::json!({"data": {"id": 7, "amount": 1}});
        let envelope = WebhookEnvelope::parse(&payload).unwrap();
        assert!(envelope.transaction().is_err());
    }

    #[test]
    fn test_envelope_rejects_empty_data() {
        for payload in [
            serde_json::json!({"error": 0}),
            serde_json::json!({"error": 0, "data": {}}),
            serde_json::json!({"error": 0, "data": null}),
        ] {
            let envelope = WebhookEnvelope::parse(&payload).unwrap();
            assert!(envelope.transaction().is_err());
        }
    }

    #[test]
    fn test_transaction_id_normalized_from_number() {
        let payload = serde_json::json!({
            "error": 0,
            "data": {"id": 987654, "description": "CK 1700000001", "amount": 50000}
        });
        let tx = WebhookEnvelope::parse(&payload).unwrap().transaction().unwrap();
        assert_eq!(tx.id, "987654");
        assert_eq!(tx.amount, 50000);
        assert_eq!(tx.order_id().unwrap(), "1700000001");
    }

    #[test]
    fn test_unresolvable_description() {
        let tx = WebhookTransaction {
            id: "T1".to_string(),
            description: "khong co ma don".to_string(),
            amount: 1000,
        };
        assert!(matches!(tx.order_id(), Err(AppError::UnresolvableOrder)));
    }
}
