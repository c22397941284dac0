//! Metrics handler module
//!
//! This module contains the metrics endpoint handler.

use std::sync::Arc;

use crate::application::services::MetricsService;
use crate::config::AppConfig;
use crate::middleware::security_headers::{
    create_json_response_with_security_headers, SecurityHeadersMiddleware,
};
use warp::Reply;

/// Handle metrics requests
pub async fn handle_metrics_request(
    metrics: Arc<MetricsService>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let response = create_json_response_with_security_headers(
        &metrics.get_metrics(),
        &SecurityHeadersMiddleware::new(&config),
    );

    Ok(response)
}
