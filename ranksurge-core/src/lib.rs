//! # Ranksurge Core
//!
//! The load-shaping heart of the ranking service. A top-N ranking request is
//! split into small windows that are read one after another, each window
//! holding a pooled connection for a shaped delay. Under concurrent callers
//! (or a single very large request) the bounded pool saturates in a
//! reproducible way.
//!
//! ## Components
//!
//! - [`ResourcePool`]: bounded pool with acquisition timeout and in-use accounting
//! - [`DelayShaper`]: maps `(chunk_index, total_chunks)` to a hold duration
//! - [`ChunkedFetcher`]: sequential, all-or-nothing windowed fetch
//! - [`ProfileEnricher`]: id correction, level derivation, status annotation
//! - [`RankingService`]: fetch then enrich, with timing reported to a [`RankingObserver`]
//!
//! The score store itself sits behind [`ScoreStore`] / [`ScoreConnection`];
//! [`MemoryScoreStore`] ships here for tests and demos.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use ranksurge_core::{
//!     ChunkedFetcher, DelayShaper, MemoryScoreStore, ProfileEnricher, RankingService,
//!     RankingSettings, ResourcePool,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryScoreStore::new();
//! store.insert("player-1", Some(1200), 1_700_000_000_000);
//!
//! let pool = ResourcePool::connect(&store, 4, Duration::from_millis(250)).await?;
//! let fetcher = ChunkedFetcher::new(pool, DelayShaper::default());
//! let service = RankingService::new(fetcher, ProfileEnricher::default(), RankingSettings::default());
//!
//! let top = service.top_rankings(10).await?;
//! assert_eq!(top[0].level, "expert");
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod delay;
pub mod enrich;
pub mod error;
pub mod fetcher;
pub mod memory;
pub mod observer;
pub mod pool;
pub mod ranking;
pub mod record;
pub mod store;

// Re-export commonly used types
pub use chunk::{ChunkPlan, ChunkWindow};
pub use delay::{DelayProfile, DelayShaper, DelayTier};
pub use enrich::{EnrichmentRules, IdCorrection, LevelThreshold, ProfileEnricher};
pub use error::{
    EnrichError, FetchError, PoolError, RankingError, RankingStage, StoreError, StoreResult,
};
pub use fetcher::ChunkedFetcher;
pub use memory::MemoryScoreStore;
pub use observer::{
    ChunkOutcome, EnrichOutcome, NoopObserver, RankingObserver, RequestOutcome, TracingObserver,
};
pub use pool::{PoolHandle, PoolStatus, ResourcePool};
pub use ranking::{RankingService, RankingSettings};
pub use record::{EnrichedRecord, Record};
pub use store::{ScoreConnection, ScoreStore};
