//! Payer-facing payment view handler

use std::collections::HashMap;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::Reply;

use crate::application::services::{MetricsService, PayerView, PresenterService};
use crate::config::AppConfig;
use crate::infrastructure::adapters::TokenEnvelope;
use crate::infrastructure::http::models::{payer_error_body, RequestContext};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::middleware::security_headers::{
    create_json_response_with_security_headers, SecurityHeadersMiddleware,
};
use crate::shared::error::AppError;
use crate::shared::logging::LoggingUtils;

/// Handle `GET /pay?signature=<token>`
///
/// Opens the sealed request token, materializes the session and projects it
/// for the payer. A paid session answers with a redirect back to the
/// originating service; anything else is JSON view data.
pub async fn handle_payment_view(
    query: HashMap<String, String>,
    client_ip: Option<String>,
    envelope: Arc<TokenEnvelope>,
    presenter: Arc<PresenterService>,
    rate_limit: Arc<RateLimitMiddleware>,
    metrics: Arc<MetricsService>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let headers = SecurityHeadersMiddleware::new(&config);
    let client_ip = client_ip.unwrap_or_else(|| "unknown".to_string());

    if rate_limit.check(&client_ip).is_err() {
        metrics.record_rate_limited_request();
        let body = AppError::RateLimit.to_error_body();
        let response = create_json_response_with_security_headers(&body, &headers);
        return Ok(warp::reply::with_status(response, StatusCode::TOO_MANY_REQUESTS).into_response());
    }

    let context = RequestContext::new(client_ip.clone());

    let Some(token) = query.get("signature") else {
        metrics.record_request(false);
        let body = payer_error_body("MISSING_SIGNATURE", "Missing payment token");
        let response = create_json_response_with_security_headers(&body, &headers);
        return Ok(warp::reply::with_status(response, StatusCode::BAD_REQUEST).into_response());
    };

    let result = match envelope.open(token) {
        Ok(data) => presenter.present_payment(&data).await,
        Err(e) => Err(e),
    };

    let response = match result {
        Ok(PayerView::PaidRedirect { redirect_url }) => {
            metrics.record_request(true);
            warp::reply::with_header(
                warp::reply::with_status(warp::reply::reply(), StatusCode::FOUND),
                warp::http::header::LOCATION,
                redirect_url,
            )
            .into_response()
        }
        Ok(view) => {
            metrics.record_request(true);
            create_json_response_with_security_headers(&view, &headers)
        }
        Err(e) => {
            metrics.record_request(false);
            if matches!(e, AppError::InvalidToken(_)) {
                LoggingUtils::log_security_event("invalid_token", &e.to_string(), &client_ip);
            }
            LoggingUtils::log_failure(&context.request_id, &e);
            let body = payer_error_body(e.error_code(), &e.to_string());
            let response = create_json_response_with_security_headers(&body, &headers);
            warp::reply::with_status(response, e.http_status_code()).into_response()
        }
    };

    Ok(response)
}
