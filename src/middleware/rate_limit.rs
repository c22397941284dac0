//! Per-IP rate limiting for the public endpoints
//!
//! The payer page and polling endpoints sit behind this limiter; the
//! webhook endpoint is exempt so aggregator retries are never throttled.

use crate::config::AppConfig;
use crate::shared::error::{AppError, AppResult};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Keyed per-client rate limiter
pub struct RateLimitMiddleware {
    limiter: Option<Arc<DefaultKeyedRateLimiter<String>>>,
}

impl RateLimitMiddleware {
    pub fn new(config: &AppConfig) -> Self {
        if !config.rate_limit.enabled {
            return Self { limiter: None };
        }

        let per_minute =
            NonZeroU32::new(config.rate_limit.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.rate_limit.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self { limiter: Some(Arc::new(RateLimiter::keyed(quota))) }
    }

    /// Check the request budget for one client
    pub fn check(&self, client_ip: &str) -> AppResult<()> {
        if let Some(limiter) = &self.limiter {
            if limiter.check_key(&client_ip.to_string()).is_err() {
                return Err(AppError::RateLimit);
            }
        }
        Ok(())
    }
}
