//! Route builder module
//!
//! This module contains the main route builder that orchestrates the creation
//! of all application routes.

use crate::{
    application::services::{MetricsService, PresenterService, ReconciliationService},
    config::AppConfig,
    infrastructure::adapters::TokenEnvelope,
    infrastructure::http::routes::{HealthRoutes, MetricsRoutes, PaymentsRoutes, WebhookRoutes},
    middleware::rate_limit::RateLimitMiddleware,
};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

/// Route builder that orchestrates the creation of all application routes
pub struct RouteBuilder;

impl RouteBuilder {
    /// Build all application routes
    pub fn build_routes(
        config: AppConfig,
        envelope: Arc<TokenEnvelope>,
        presenter: Arc<PresenterService>,
        reconciliation: Arc<ReconciliationService>,
        rate_limit: Arc<RateLimitMiddleware>,
        metrics: Arc<MetricsService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
        let payments_routes = PaymentsRoutes::create_routes(
            config.clone(),
            envelope,
            presenter,
            rate_limit,
            metrics.clone(),
        );

        let webhook_routes = WebhookRoutes::create_routes(
            config.clone(),
            reconciliation,
            metrics.clone(),
        );

        let health_route = HealthRoutes::create_health_route(config.clone());

        let metrics_route = MetricsRoutes::create_metrics_route(config, metrics);

        payments_routes
            .or(webhook_routes)
            .or(health_route)
            .or(metrics_route)
            .recover(handle_rejection)
    }
}

/// Map unmatched requests and transport-level rejections to JSON errors
async fn handle_rejection(err: warp::Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    let body = serde_json::json!({
        "status": "error",
        "message": message,
    });

    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}
