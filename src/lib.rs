//! VietQR Payment Bridge - payment confirmation between bank transfers and originating services
//!
//! This library implements a bridge that turns signed payment-request
//! tokens into trackable payment sessions, verifies bank-aggregator
//! webhook notifications, and reconciles reported transactions against
//! those sessions, including the split/convert-to-donation policy for
//! mismatched amounts.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod shared;

#[cfg(test)]
mod tests;

pub use config::AppConfig;
pub use infrastructure::http::HttpServer;
pub use shared::error::{AppError, AppResult};

/// Application result type
pub type Result<T> = std::result::Result<T, shared::error::AppError>;
