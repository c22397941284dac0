//! Status-poll and payment-info handlers

use std::sync::Arc;

use warp::http::StatusCode;
use warp::Reply;

use crate::application::services::{MetricsService, PresenterService};
use crate::config::AppConfig;
use crate::infrastructure::http::models::RequestContext;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::middleware::security_headers::{
    create_json_response_with_security_headers, SecurityHeadersMiddleware,
};
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;

/// Handle `GET /api/payment-status/{order_id}` (frontend polling)
pub async fn handle_payment_status(
    order_id: String,
    client_ip: Option<String>,
    presenter: Arc<PresenterService>,
    rate_limit: Arc<RateLimitMiddleware>,
    metrics: Arc<MetricsService>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let headers = SecurityHeadersMiddleware::new(&config);
    let client_ip = client_ip.unwrap_or_else(|| "unknown".to_string());

    if let Some(response) = check_rate_limit(&rate_limit, &metrics, &headers, &client_ip) {
        return Ok(response);
    }

    Ok(respond(&metrics, &headers, &client_ip, presenter.present_status(&order_id).await))
}

/// Handle `GET /api/payment-info/{order_id}` (originating-service backend)
pub async fn handle_payment_info(
    order_id: String,
    client_ip: Option<String>,
    presenter: Arc<PresenterService>,
    rate_limit: Arc<RateLimitMiddleware>,
    metrics: Arc<MetricsService>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let headers = SecurityHeadersMiddleware::new(&config);
    let client_ip = client_ip.unwrap_or_else(|| "unknown".to_string());

    if let Some(response) = check_rate_limit(&rate_limit, &metrics, &headers, &client_ip) {
        return Ok(response);
    }

    Ok(respond(&metrics, &headers, &client_ip, presenter.present_info(&order_id).await))
}

fn check_rate_limit(
    rate_limit: &RateLimitMiddleware,
    metrics: &MetricsService,
    headers: &SecurityHeadersMiddleware,
    client_ip: &str,
) -> Option<warp::reply::Response> {
    if rate_limit.check(client_ip).is_ok() {
        return None;
    }

    metrics.record_rate_limited_request();
    let body = AppError::RateLimit.to_error_body();
    let response = create_json_response_with_security_headers(&body, headers);
    Some(warp::reply::with_status(response, StatusCode::TOO_MANY_REQUESTS).into_response())
}

fn respond<T: serde::Serialize>(
    metrics: &MetricsService,
    headers: &SecurityHeadersMiddleware,
    client_ip: &str,
    result: AppResult<T>,
) -> warp::reply::Response {
    match result {
        Ok(view) => {
            metrics.record_request(true);
            create_json_response_with_security_headers(&view, headers)
        }
        Err(e) => {
            metrics.record_request(false);
            let context = RequestContext::new(client_ip.to_string());
            LoggingUtils::log_failure(&context.request_id, &e);
            let response = create_json_response_with_security_headers(&e.to_error_body(), headers);
            warp::reply::with_status(response, e.http_status_code()).into_response()
        }
    }
}
