//! HTTP utilities - Common helper functions
//!
//! This module contains the filter injectors shared across route
//! definitions, so handlers receive their collaborators as arguments.

use crate::application::services::{MetricsService, PresenterService, ReconciliationService};
use crate::config::AppConfig;
use crate::infrastructure::adapters::TokenEnvelope;
use crate::middleware::rate_limit::RateLimitMiddleware;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

/// Client IP as reported by the reverse proxy
///
/// Deployment sits behind nginx/Caddy like the rest of the stack; the
/// socket address is the proxy's, so `x-forwarded-for` is the usable
/// client identity and its absence is tolerated for direct local access.
pub fn with_client_ip() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("x-forwarded-for")
}

pub fn with_config(config: AppConfig) -> impl Filter<Extract = (AppConfig,), Error = Infallible> + Clone {
    warp::any().map(move || config.clone())
}

pub fn with_envelope(
    envelope: Arc<TokenEnvelope>,
) -> impl Filter<Extract = (Arc<TokenEnvelope>,), Error = Infallible> + Clone {
    warp::any().map(move || envelope.clone())
}

pub fn with_presenter(
    presenter: Arc<PresenterService>,
) -> impl Filter<Extract = (Arc<PresenterService>,), Error = Infallible> + Clone {
    warp::any().map(move || presenter.clone())
}

pub fn with_reconciliation(
    service: Arc<ReconciliationService>,
) -> impl Filter<Extract = (Arc<ReconciliationService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

pub fn with_metrics(
    metrics: Arc<MetricsService>,
) -> impl Filter<Extract = (Arc<MetricsService>,), Error = Infallible> + Clone {
    warp::any().map(move || metrics.clone())
}

pub fn with_rate_limit(
    rate_limit: Arc<RateLimitMiddleware>,
) -> impl Filter<Extract = (Arc<RateLimitMiddleware>,), Error = Infallible> + Clone {
    warp::any().map(move || rate_limit.clone())
}
