//! Server startup and shutdown logic

use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use ranksurge_config::RanksurgeConfig;
use ranksurge_core::{
    ChunkedFetcher, DelayShaper, ProfileEnricher, RankingService, ResourcePool, TracingObserver,
};
use ranksurge_rest_api::{create_rest_app, AppContext};
use ranksurge_storage::{SeedPlan, SqliteScoreStore};

use crate::bridges;

/// Server application struct
pub struct Server {
    config: RanksurgeConfig,
    context: AppContext,
    // Keeps the administrative connection, and with it any in-memory database, alive
    _store: Arc<SqliteScoreStore>,
}

impl Server {
    /// Create a new server instance: logging, store, pool and ranking service
    pub async fn new(config: RanksurgeConfig) -> Result<Self> {
        // Initialize logging first
        ranksurge_logging::init_logging_from_config(&config.logging)?;

        let store = Arc::new(
            SqliteScoreStore::open(&config.database.url)
                .await
                .with_context(|| format!("Failed to open score store {}", config.database.url))?,
        );

        if config.database.create_schema {
            store.migrate().await.context("Failed to create score schema")?;
        }

        if config.database.seed_rows > 0 {
            let plan = SeedPlan::for_rows(config.database.seed_rows as usize);
            store.seed(&plan).await.context("Failed to seed score table")?;
        }

        let pool = ResourcePool::connect(
            &*store,
            config.database.max_connections as usize,
            config.database.acquire_timeout,
        )
        .await
        .context("Failed to fill connection pool")?;

        let fetcher = ChunkedFetcher::new(
            pool,
            DelayShaper::new(bridges::delay_profile(&config.ranking.delay)),
        )
        .with_high_chunk_warning_threshold(config.ranking.high_chunk_warning_threshold);

        let service = RankingService::new(
            fetcher,
            ProfileEnricher::new(bridges::enrichment_rules(&config.enrichment)),
            bridges::ranking_settings(&config.ranking),
        )
        .with_observer(Arc::new(TracingObserver));

        let context = AppContext::new(Arc::new(service), config.server.service_name.as_str());

        Ok(Self {
            config,
            context,
            _store: store,
        })
    }

    /// Build the complete application router
    pub fn build_app(&self) -> Router {
        create_rest_app(self.context.clone(), bridges::app_config(&self.config.server))
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let app = self.build_app();
        let addr = format!(
            "{}:{}",
            self.config.server.bind_address, self.config.server.port
        );

        tracing::info!("Starting ranksurge server on {}", addr);

        // Print configuration summary
        self.log_config_summary();

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Log configuration summary
    fn log_config_summary(&self) {
        let config = &self.config;
        tracing::info!("=== Ranksurge Server Configuration ===");
        tracing::info!("Service: {}", config.server.service_name);
        tracing::info!("Database: {}", config.database.url);
        tracing::info!(
            "Pool: {} connections, acquire timeout {:?}",
            config.database.max_connections,
            config.database.acquire_timeout
        );
        tracing::info!(
            "Chunks: {} rows, limit {} (max {}), warn above {} chunks",
            config.ranking.chunk_size,
            config.ranking.default_limit,
            config.ranking.max_limit,
            config.ranking.high_chunk_warning_threshold
        );
        tracing::info!(
            "Delay: base {:?}, elevated {:?} from {} chunks, runaway from {} chunks (+{:?} x index²)",
            config.ranking.delay.base,
            config.ranking.delay.elevated,
            config.ranking.delay.elevated_from_chunks,
            config.ranking.delay.runaway_from_chunks,
            config.ranking.delay.escalation_step
        );
        tracing::info!("CORS: {}", if config.server.cors.enabled { "Enabled" } else { "Disabled" });
        tracing::info!("Tracing: {}", if config.server.enable_tracing { "Enabled" } else { "Disabled" });
        tracing::info!("======================================");
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
