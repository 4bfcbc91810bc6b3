//! Main application configuration and router setup

use axum::{routing::get, Router};
use ranksurge_config::CorsConfig;
use ranksurge_core::RankingService;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{handlers, middleware::cors_layer_with_config};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// CORS settings; `enabled: false` installs no CORS layer
    pub cors: CorsConfig,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cors: CorsConfig::default(),
            enable_tracing: true,
        }
    }
}

/// Shared handler state
#[derive(Clone)]
pub struct AppContext {
    pub rankings: Arc<RankingService>,
    pub service_name: Arc<str>,
}

impl AppContext {
    pub fn new(rankings: Arc<RankingService>, service_name: impl Into<Arc<str>>) -> Self {
        Self {
            rankings,
            service_name: service_name.into(),
        }
    }
}

/// Create the complete REST API application
pub fn create_rest_app(context: AppContext, config: AppConfig) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::health_check))
        .route("/health/pool", get(handlers::pool_health))
        .route("/rankings/top", get(handlers::top_rankings))
        .with_state(context);

    // Add middleware layers (applied in reverse order)
    if config.cors.enabled {
        app = app.layer(cors_layer_with_config(&config.cors));
    }

    if config.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}
