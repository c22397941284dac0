//! Common test utilities and fixtures
//!
//! Builds a fully wired route stack over an in-memory store, plus helpers
//! to produce sealed tokens and signed webhook deliveries the way the
//! external collaborators do.

use std::convert::Infallible;
use std::sync::Arc;

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use warp::Filter;

use crate::application::services::{MetricsService, PresenterService, ReconciliationService};
use crate::config::AppConfig;
use crate::domain::token::PaymentRequestData;
use crate::infrastructure::adapters::webhook_verifier::canonicalize;
use crate::infrastructure::adapters::{SessionStore, TokenEnvelope};
use crate::infrastructure::http::routes::RouteBuilder;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Fully wired application over an in-memory store
pub struct TestHarness {
    pub config: AppConfig,
    pub store: Arc<SessionStore>,
    pub envelope: Arc<TokenEnvelope>,
    pub metrics: Arc<MetricsService>,
    presenter: Arc<PresenterService>,
    reconciliation: Arc<ReconciliationService>,
    rate_limit: Arc<RateLimitMiddleware>,
}

impl TestHarness {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(SessionStore::new(None));
        let envelope = Arc::new(TokenEnvelope::new(&config.security.token_secret));
        let presenter = Arc::new(PresenterService::new(store.clone(), config.payment.clone()));
        let reconciliation =
            Arc::new(ReconciliationService::new(store.clone(), config.payment.clone()));
        let metrics = Arc::new(MetricsService::new());
        let rate_limit = Arc::new(RateLimitMiddleware::new(&config));

        Self {
            config,
            store,
            envelope,
            metrics,
            presenter,
            reconciliation,
            rate_limit,
        }
    }

    /// The complete route stack, as served in production
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
        RouteBuilder::build_routes(
            self.config.clone(),
            self.envelope.clone(),
            self.presenter.clone(),
            self.reconciliation.clone(),
            self.rate_limit.clone(),
            self.metrics.clone(),
        )
    }
}

/// Fixtures for request and webhook payloads
pub mod fixtures {
    use super::*;

    pub fn request_data(order_id: &str, amount: i64, payment_type: &str) -> PaymentRequestData {
        PaymentRequestData {
            order_id: order_id.to_string(),
            amount,
            description: format!("Thanh toan {}", order_id),
            account_number: "0123456789".to_string(),
            return_url: "https://fund.example.com/result".to_string(),
            username: Some("alice".to_string()),
            payment_type: payment_type.to_string(),
            per_month_price: Some(amount),
            expired_at: Utc::now().timestamp() + 900,
        }
    }

    pub fn webhook_payload(transaction_id: &str, order_id: &str, amount: i64) -> Value {
        serde_json::json!({
            "error": 0,
            "data": {
                "id": transaction_id,
                "description": format!("CK {} thanh toan", order_id),
                "amount": amount,
                "when": "2026-08-06 10:00:00",
            }
        })
    }

    /// Sign a webhook payload the way the aggregator does
    pub fn webhook_signature(payload: &Value, secret: &str) -> String {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let canonical = serde_json::to_string(&canonicalize(payload)).unwrap();

        let mut mac = Hmac::<Sha512>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, canonical).as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());

        format!("t={},v1={}", timestamp, signature)
    }
}
