//! Bank-aggregator webhook handler

use std::sync::Arc;

use warp::http::StatusCode;
use warp::Reply;

use crate::application::services::{MetricsService, ReconciliationService};
use crate::config::AppConfig;
use crate::domain::webhook::WebhookEnvelope;
use crate::infrastructure::adapters::WebhookVerifier;
use crate::infrastructure::http::models::{RequestContext, WebhookResponse};
use crate::middleware::security_headers::{
    create_json_response_with_security_headers, SecurityHeadersMiddleware,
};
use crate::shared::error::AppError;
use crate::shared::logging::LoggingUtils;
use tracing::info;

/// Handle `POST /webhook/bank-transaction`
///
/// Authenticates the delivery, extracts the transaction and applies it to
/// the matching session. A 200 is returned for both fresh confirmations and
/// idempotent redeliveries; everything else maps onto the error taxonomy
/// (400 malformed/conflict, 401 bad signature, 404 unknown order, 500
/// store failure - the aggregator retries those).
pub async fn handle_bank_webhook(
    body: bytes::Bytes,
    signature_header: Option<String>,
    client_ip: Option<String>,
    service: Arc<ReconciliationService>,
    metrics: Arc<MetricsService>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let headers = SecurityHeadersMiddleware::new(&config);
    let client_ip = client_ip.unwrap_or_else(|| "unknown".to_string());
    let context = RequestContext::new(client_ip.clone());

    metrics.record_webhook_received();

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            metrics.record_request(false);
            let error = AppError::MalformedWebhook(format!("invalid JSON: {}", e));
            LoggingUtils::log_failure(&context.request_id, &error);
            let response = create_json_response_with_security_headers(&error.to_error_body(), &headers);
            return Ok(warp::reply::with_status(response, StatusCode::BAD_REQUEST));
        }
    };

    match &config.security.webhook_secret {
        Some(secret) => {
            let header_value = signature_header.as_deref().unwrap_or("");
            if !WebhookVerifier::verify(&payload, header_value, secret) {
                metrics.record_request(false);
                LoggingUtils::log_security_event(
                    "invalid_webhook_signature",
                    "signature verification failed",
                    &client_ip,
                );
                let error = AppError::SignatureInvalid;
                let response =
                    create_json_response_with_security_headers(&error.to_error_body(), &headers);
                return Ok(warp::reply::with_status(response, error.http_status_code()));
            }
            info!(request_id = %context.request_id, "Webhook signature verified");
        }
        None => LoggingUtils::log_verification_bypass(),
    }

    let result = WebhookEnvelope::parse(&payload)
        .and_then(|envelope| envelope.transaction());
    let transaction = match result {
        Ok(transaction) => transaction,
        Err(e) => {
            metrics.record_request(false);
            LoggingUtils::log_failure(&context.request_id, &e);
            let response = create_json_response_with_security_headers(&e.to_error_body(), &headers);
            return Ok(warp::reply::with_status(response, e.http_status_code()));
        }
    };

    let response = match service.apply_transaction(&transaction).await {
        Ok(outcome) => {
            metrics.record_request(true);
            metrics.record_reconciliation(&outcome);
            let body = WebhookResponse::from_outcome(&outcome);
            let response = create_json_response_with_security_headers(&body, &headers);
            warp::reply::with_status(response, StatusCode::OK)
        }
        Err(e) => {
            metrics.record_request(false);
            LoggingUtils::log_failure(&context.request_id, &e);
            let response = create_json_response_with_security_headers(&e.to_error_body(), &headers);
            warp::reply::with_status(response, e.http_status_code())
        }
    };

    Ok(response)
}
