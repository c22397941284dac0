//! Webhook routes

use std::sync::Arc;
use warp::Filter;

use crate::application::services::{MetricsService, ReconciliationService};
use crate::config::AppConfig;
use crate::infrastructure::http::handlers::handle_bank_webhook;
use crate::infrastructure::http::utils::{with_client_ip, with_config, with_metrics, with_reconciliation};

pub struct WebhookRoutes;

impl WebhookRoutes {
    /// Create the bank-transaction webhook route
    ///
    /// Deliberately not rate limited: the aggregator owns retry behavior
    /// and a throttled retry would only delay reconciliation.
    pub fn create_routes(
        config: AppConfig,
        service: Arc<ReconciliationService>,
        metrics: Arc<MetricsService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path!("webhook" / "bank-transaction")
            .and(warp::post())
            .and(warp::body::content_length_limit(config.server.max_request_size as u64))
            .and(warp::body::bytes())
            .and(warp::header::optional::<String>("x-casso-signature"))
            .and(with_client_ip())
            .and(with_reconciliation(service))
            .and(with_metrics(metrics))
            .and(with_config(config))
            .and_then(handle_bank_webhook)
    }
}
