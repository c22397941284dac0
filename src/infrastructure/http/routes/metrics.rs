//! Metrics routes module
//!
//! This module contains metrics route configurations.

use crate::{
    application::services::MetricsService,
    config::AppConfig,
    infrastructure::http::{handlers::handle_metrics_request, utils::{with_config, with_metrics}},
};
use std::sync::Arc;
use warp::Filter;

/// Metrics routes configuration
pub struct MetricsRoutes;

impl MetricsRoutes {
    /// Create the metrics endpoint route
    pub fn create_metrics_route(
        config: AppConfig,
        metrics: Arc<MetricsService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path("metrics")
            .and(warp::get())
            .and(with_metrics(metrics))
            .and(with_config(config))
            .and_then(handle_metrics_request)
    }
}
