//! Error handling module
//!
//! This module provides centralized error handling for the application.

use thiserror::Error;
use serde_json::Value;

/// Application error types
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid payment token: {0}")]
    InvalidToken(String),

    #[error("Payment token has expired")]
    TokenExpired,

    #[error("Webhook signature verification failed")]
    SignatureInvalid,

    #[error("Malformed webhook payload: {0}")]
    MalformedWebhook(String),

    #[error("No order reference found in transaction description")]
    UnresolvableOrder,

    #[error("Payment session not found for order {order_id}")]
    SessionNotFound { order_id: String },

    #[error("Order {order_id} already paid with a different transaction")]
    AlreadyPaid { order_id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Rate limit exceeded")]
    RateLimit,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidToken(_) => "INVALID_SIGNATURE",
            AppError::TokenExpired => "EXPIRED_SIGNATURE",
            AppError::SignatureInvalid => "INVALID_WEBHOOK_SIGNATURE",
            AppError::MalformedWebhook(_) => "MALFORMED_WEBHOOK",
            AppError::UnresolvableOrder => "UNRESOLVABLE_ORDER",
            AppError::SessionNotFound { .. } => "SESSION_NOT_FOUND",
            AppError::AlreadyPaid { .. } => "ALREADY_PAID",
            AppError::Store(_) => "STORE_ERROR",
            AppError::RateLimit => "RATE_LIMIT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to a JSON error body for HTTP responses
    pub fn to_error_body(&self) -> Value {
        let mut body = serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        });

        // Echo the order id so the caller can correlate failed deliveries
        match self {
            AppError::SessionNotFound { order_id } | AppError::AlreadyPaid { order_id } => {
                body["order_id"] = Value::String(order_id.clone());
            }
            _ => {}
        }

        body
    }

    /// Get HTTP status code for this error
    pub fn http_status_code(&self) -> warp::http::StatusCode {
        match self {
            AppError::Validation(_) => warp::http::StatusCode::BAD_REQUEST,
            AppError::InvalidToken(_) => warp::http::StatusCode::BAD_REQUEST,
            AppError::TokenExpired => warp::http::StatusCode::BAD_REQUEST,
            AppError::SignatureInvalid => warp::http::StatusCode::UNAUTHORIZED,
            AppError::MalformedWebhook(_) => warp::http::StatusCode::BAD_REQUEST,
            AppError::UnresolvableOrder => warp::http::StatusCode::BAD_REQUEST,
            AppError::SessionNotFound { .. } => warp::http::StatusCode::NOT_FOUND,
            AppError::AlreadyPaid { .. } => warp::http::StatusCode::BAD_REQUEST,
            AppError::RateLimit => warp::http::StatusCode::TOO_MANY_REQUESTS,
            _ => warp::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

// Implement warp::reject::Reject for AppError
impl warp::reject::Reject for AppError {}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedWebhook(err.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Store(err.to_string())
    }
}
