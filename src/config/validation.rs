//! Configuration validation module
//!
//! This module provides additional validation logic for configuration
//! beyond the basic validator crate validation.

use crate::config::AppConfig;
use crate::shared::error::AppError;

/// Configuration validator for additional validation logic
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the complete configuration
    pub fn validate_config(config: &AppConfig) -> crate::Result<()> {
        Self::validate_security_config(&config.security)?;
        Self::validate_rate_limit_config(&config.rate_limit)?;
        Self::validate_store_config(&config.store)?;

        Ok(())
    }

    /// Validate security configuration
    fn validate_security_config(security: &crate::config::app_config::SecurityConfig) -> crate::Result<()> {
        if let Some(secret) = &security.webhook_secret {
            if secret.is_empty() {
                return Err(AppError::Validation(
                    "webhook_secret is set but empty; unset it to enable the bypass mode explicitly".to_string()
                ));
            }
        } else {
            tracing::warn!("webhook_secret is not configured - webhook signature verification will be skipped");
        }

        Ok(())
    }

    /// Validate rate limiting configuration
    fn validate_rate_limit_config(rate_limit: &crate::config::app_config::RateLimitConfig) -> crate::Result<()> {
        if rate_limit.enabled {
            if rate_limit.requests_per_minute == 0 {
                return Err(AppError::Validation(
                    "Rate limiting enabled but requests_per_minute is 0".to_string()
                ));
            }

            if rate_limit.burst_size > rate_limit.requests_per_minute {
                return Err(AppError::Validation(
                    "Burst size cannot be greater than requests per minute".to_string()
                ));
            }
        }

        Ok(())
    }

    /// Validate store configuration
    fn validate_store_config(store: &crate::config::app_config::StoreConfig) -> crate::Result<()> {
        if let Some(url) = &store.redis_url {
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(AppError::Validation(
                    "redis_url must start with redis:// or rediss://".to_string()
                ));
            }
        }

        Ok(())
    }
}
