//! HTTP models - Infrastructure concerns
//!
//! This module contains models that are specific to infrastructure concerns
//! like HTTP requests/responses, serialization, and external interfaces.

use crate::application::services::ReconcileOutcome;
use serde::Serialize;
use serde_json::Value;

/// HTTP request context for tracking and logging (infrastructure concern)
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID
    pub request_id: String,

    /// Client IP address
    pub client_ip: String,

    /// Request timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(client_ip: String) -> Self {
        Self {
            request_id: crate::shared::logging::LoggingUtils::generate_request_id(),
            client_ip,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Webhook response body for successful reconciliations
#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_mismatch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_payment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_to_donate: Option<bool>,
}

impl WebhookResponse {
    /// Build the success body for a reconciliation outcome
    pub fn from_outcome(outcome: &ReconcileOutcome) -> Self {
        if outcome.already_processed {
            return Self {
                status: "success",
                order_id: outcome.order_id.clone(),
                message: Some("Already processed"),
                amount_mismatch: None,
                split_payment: None,
                converted_to_donate: None,
            };
        }

        Self {
            status: "success",
            order_id: outcome.order_id.clone(),
            message: None,
            amount_mismatch: Some(outcome.amount_mismatch),
            split_payment: Some(outcome.split_payment),
            converted_to_donate: Some(outcome.converted_to_donate),
        }
    }
}

/// Error body for payer-facing endpoints, carrying a stable error code
pub fn payer_error_body(error_code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "error_code": error_code,
        "message": message,
    })
}
