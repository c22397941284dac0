//! Infrastructure layer - External concerns and adapters
//!
//! This module contains infrastructure concerns including the session
//! store, crypto adapters, and HTTP handling.

pub mod adapters;
pub mod http;

// Re-export main adapters
pub use adapters::{SessionStore, TokenEnvelope, WebhookVerifier};
