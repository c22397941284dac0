//! Test suite for the payment bridge
//!
//! Unit tests live next to the code they cover; this tree holds the shared
//! fixtures and the HTTP integration tests that drive the full stack
//! through warp's test request support.

pub mod common;
pub mod integration;

/// Test configuration and utilities
pub mod config {
    use crate::config::AppConfig;

    /// Create test configuration with verification fully enabled
    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.security.token_secret = "unit-test-token-secret-0123456789abcdef".to_string();
        config.security.webhook_secret = Some("unit-test-webhook-secret".to_string());
        config.rate_limit.enabled = false;
        config
    }

    /// Test configuration with the webhook-verification bypass active
    pub fn bypass_config() -> AppConfig {
        let mut config = test_config();
        config.security.webhook_secret = None;
        config
    }
}
