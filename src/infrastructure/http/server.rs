//! HTTP server implementation for reverse proxy deployment
//!
//! This module contains the HTTP server implementation optimized for deployment
//! behind a reverse proxy (nginx, Caddy, etc.) that handles SSL, compression, and CORS.

use crate::{
    application::services::{MetricsService, PresenterService, ReconciliationService},
    config::AppConfig,
    infrastructure::adapters::{SessionStore, TokenEnvelope},
    infrastructure::http::routes::RouteBuilder,
    middleware::rate_limit::RateLimitMiddleware,
    shared::error::AppResult,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// HTTP server wiring all layers of the payment bridge together
pub struct HttpServer {
    config: AppConfig,
    envelope: Arc<TokenEnvelope>,
    presenter: Arc<PresenterService>,
    reconciliation: Arc<ReconciliationService>,
    rate_limit: Arc<RateLimitMiddleware>,
    metrics: Arc<MetricsService>,
}

impl HttpServer {
    /// Create a new HTTP server instance
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        // Infrastructure layer
        let redis = match &config.store.redis_url {
            Some(url) => {
                let client = redis::Client::open(url.as_str())?;
                let manager = client.get_connection_manager().await?;
                info!("Connected session store mirror to Redis");
                Some(Arc::new(manager))
            }
            None => {
                info!("No Redis URL configured, session store runs memory-only");
                None
            }
        };
        let store = Arc::new(SessionStore::new(redis));
        let envelope = Arc::new(TokenEnvelope::new(&config.security.token_secret));

        // Application layer
        let presenter = Arc::new(PresenterService::new(store.clone(), config.payment.clone()));
        let reconciliation = Arc::new(ReconciliationService::new(store, config.payment.clone()));
        let metrics = Arc::new(MetricsService::new());

        // Middleware
        let rate_limit = Arc::new(RateLimitMiddleware::new(&config));

        Ok(Self {
            config,
            envelope,
            presenter,
            reconciliation,
            rate_limit,
            metrics,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the server until the process is stopped
    pub async fn run(self) -> AppResult<()> {
        let routes = RouteBuilder::build_routes(
            self.config.clone(),
            self.envelope,
            self.presenter,
            self.reconciliation,
            self.rate_limit,
            self.metrics,
        );

        let address = SocketAddr::new(self.config.server.bind_address, self.config.server.port);
        info!(address = %address, "HTTP server listening");

        warp::serve(routes).run(address).await;

        Ok(())
    }
}
