//! Health check handler module
//!
//! This module contains the health check endpoint handler for monitoring system status.

use crate::config::AppConfig;
use crate::middleware::security_headers::{
    create_json_response_with_security_headers, SecurityHeadersMiddleware,
};
use warp::Reply;

/// Handle health check requests
pub async fn handle_health_request(config: AppConfig) -> Result<impl Reply, warp::reject::Rejection> {
    let body = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
    });

    let response =
        create_json_response_with_security_headers(&body, &SecurityHeadersMiddleware::new(&config));

    Ok(response)
}
