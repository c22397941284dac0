//! Logging utilities module
//!
//! This module provides centralized logging functionality and utilities.

use tracing::{error, info, warn};

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified configuration
    pub fn initialize(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| crate::shared::error::AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }

    /// Log a session state transition with full audit context
    pub fn log_transition(
        order_id: &str,
        old_status: &str,
        new_status: &str,
        amount: i64,
        transaction_id: Option<&str>,
    ) {
        info!(
            order_id = %order_id,
            old_status = %old_status,
            new_status = %new_status,
            amount = %amount,
            transaction_id = transaction_id,
            "Payment session transition"
        );
    }

    /// Log a failed reconciliation or request
    pub fn log_failure(request_id: &str, error: &crate::shared::error::AppError) {
        error!(
            request_id = %request_id,
            error = %error,
            error_code = %error.error_code(),
            "Request failed"
        );
    }

    /// Log security events (invalid signatures, tampered tokens)
    pub fn log_security_event(event_type: &str, details: &str, client_ip: &str) {
        warn!(
            event_type = %event_type,
            details = %details,
            client_ip = %client_ip,
            "Security event detected"
        );
    }

    /// Log the explicit webhook-verification bypass
    pub fn log_verification_bypass() {
        warn!("Webhook secret not configured - skipping signature verification (NOT SAFE FOR PRODUCTION!)");
    }

    /// Generate a unique request ID
    pub fn generate_request_id() -> String {
        format!("req_{}", uuid::Uuid::new_v4().simple())
    }
}
