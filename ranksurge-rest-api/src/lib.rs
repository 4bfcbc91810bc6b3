//! # Ranksurge REST API
//!
//! HTTP surface of the ranking service: a health probe, a pool status probe
//! and the chunked top-rankings endpoint. Handlers share one
//! [`ranksurge_core::RankingService`] through [`AppContext`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ranksurge_core::{
//!     ChunkedFetcher, DelayShaper, MemoryScoreStore, ProfileEnricher, RankingService,
//!     RankingSettings, ResourcePool,
//! };
//! use ranksurge_rest_api::{create_rest_app, AppConfig, AppContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryScoreStore::new();
//! let pool = ResourcePool::connect(&store, 4, Duration::from_millis(250)).await?;
//! let service = RankingService::new(
//!     ChunkedFetcher::new(pool, DelayShaper::default()),
//!     ProfileEnricher::default(),
//!     RankingSettings::default(),
//! );
//!
//! let app = create_rest_app(AppContext::new(Arc::new(service), "ranksurge"), AppConfig::default());
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod errors;
pub mod handlers;
pub mod middleware;

// Re-export commonly used types
pub use app::{create_rest_app, AppConfig, AppContext};
pub use errors::{RestError, RestResult};
