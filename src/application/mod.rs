//! Application layer - Use cases and application services
//!
//! This module contains application services that orchestrate domain logic
//! for the payment bridge.

pub mod services;

pub use services::*;
