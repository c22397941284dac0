//! Security headers for JSON responses

use crate::config::AppConfig;
use warp::http::header::{CACHE_CONTROL, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS};
use warp::http::HeaderValue;
use warp::Reply;

/// Applies security headers based on configuration
#[derive(Clone)]
pub struct SecurityHeadersMiddleware {
    enabled: bool,
}

impl SecurityHeadersMiddleware {
    pub fn new(config: &AppConfig) -> Self {
        Self { enabled: config.security.enable_security_headers }
    }

    fn apply(&self, response: &mut warp::reply::Response) {
        if !self.enabled {
            return;
        }

        let headers = response.headers_mut();
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(REFERRER_POLICY, HeaderValue::from_static("no-referrer"));
        // Payment state must never be served from an intermediary cache
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }
}

/// Build a JSON response with the configured security headers applied
pub fn create_json_response_with_security_headers<T: serde::Serialize>(
    body: &T,
    middleware: &SecurityHeadersMiddleware,
) -> warp::reply::Response {
    let mut response = warp::reply::json(body).into_response();
    middleware.apply(&mut response);
    response
}
