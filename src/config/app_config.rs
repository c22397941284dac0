//! Application configuration structures
//!
//! This module contains the main configuration structures for the application.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use validator::Validate;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server address to bind to
    pub bind_address: IpAddr,

    /// Server port
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// Maximum request size in bytes
    #[validate(range(min = 1024, max = 10485760))] // 1KB to 10MB
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 8080,
            max_request_size: 65536,
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SecurityConfig {
    /// Process secret used to derive the token encryption key
    #[validate(length(min = 32))]
    pub token_secret: String,

    /// Webhook signature secret; absence enables the explicit
    /// verification-bypass mode for unconfigured environments
    pub webhook_secret: Option<String>,

    /// Enable security headers on JSON responses
    pub enable_security_headers: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            token_secret: "change-me-to-a-real-secret-at-least-32-chars".to_string(),
            webhook_secret: None,
            enable_security_headers: true,
        }
    }
}

/// Payment/QR composition configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentConfig {
    /// VietQR bank code used when composing QR image URLs
    #[validate(length(min = 1))]
    pub qr_bank_code: String,

    /// VietQR image template
    #[validate(length(min = 1))]
    pub qr_template: String,

    /// Payment type tag that participates in split/convert resolution
    #[validate(length(min = 1))]
    pub monthly_fund_type: String,

    /// Payment type tag assigned to converted and split donations
    #[validate(length(min = 1))]
    pub donate_type: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            qr_bank_code: "970416".to_string(),
            qr_template: "compact2".to_string(),
            monthly_fund_type: "monthly_fund".to_string(),
            donate_type: "donate".to_string(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateLimitConfig {
    /// Requests per minute per IP
    #[validate(range(min = 1, max = 10000))]
    pub requests_per_minute: u32,

    /// Burst size
    #[validate(range(min = 1, max = 1000))]
    pub burst_size: u32,

    /// Enable rate limiting
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 120,
            burst_size: 20,
            enabled: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct StoreConfig {
    /// Optional Redis URL for the durable session mirror;
    /// when unset the store runs memory-only
    pub redis_url: Option<String>,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Security configuration
    pub security: SecurityConfig,

    /// Payment configuration
    pub payment: PaymentConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Session store configuration
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Conf").required(false))
            .add_source(config::Environment::with_prefix("QR_BRIDGE").separator("__"))
            .build()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to build configuration: {}", e)))?;

        let config: AppConfig = config.try_deserialize()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        config.validate_config()
            .map_err(|e| crate::shared::error::AppError::Validation(format!("Configuration validation failed: {}", e)))?;
        crate::config::ConfigValidator::validate_config(&config)?;

        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> Result<(), validator::ValidationErrors> {
        self.server.validate()?;
        self.security.validate()?;
        self.payment.validate()?;
        self.rate_limit.validate()?;
        self.logging.validate()?;
        self.store.validate()?;

        Ok(())
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}
