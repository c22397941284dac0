//! Payments routes

use std::collections::HashMap;
use std::sync::Arc;
use warp::Filter;

use crate::application::services::{MetricsService, PresenterService};
use crate::config::AppConfig;
use crate::infrastructure::adapters::TokenEnvelope;
use crate::infrastructure::http::handlers::{
    handle_payment_info, handle_payment_status, handle_payment_view,
};
use crate::infrastructure::http::utils::{
    with_client_ip, with_config, with_envelope, with_metrics, with_presenter, with_rate_limit,
};
use crate::middleware::rate_limit::RateLimitMiddleware;

pub struct PaymentsRoutes;

impl PaymentsRoutes {
    pub fn create_routes(
        config: AppConfig,
        envelope: Arc<TokenEnvelope>,
        presenter: Arc<PresenterService>,
        rate_limit: Arc<RateLimitMiddleware>,
        metrics: Arc<MetricsService>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let pay = warp::path("pay")
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<HashMap<String, String>>())
            .and(with_client_ip())
            .and(with_envelope(envelope))
            .and(with_presenter(presenter.clone()))
            .and(with_rate_limit(rate_limit.clone()))
            .and(with_metrics(metrics.clone()))
            .and(with_config(config.clone()))
            .and_then(handle_payment_view);

        let status = warp::path!("api" / "payment-status" / String)
            .and(warp::get())
            .and(with_client_ip())
            .and(with_presenter(presenter.clone()))
            .and(with_rate_limit(rate_limit.clone()))
            .and(with_metrics(metrics.clone()))
            .and(with_config(config.clone()))
            .and_then(handle_payment_status);

        let info = warp::path!("api" / "payment-info" / String)
            .and(warp::get())
            .and(with_client_ip())
            .and(with_presenter(presenter))
            .and(with_rate_limit(rate_limit))
            .and(with_metrics(metrics))
            .and(with_config(config))
            .and_then(handle_payment_info);

        pay.or(status).or(info)
    }
}
