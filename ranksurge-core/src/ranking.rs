//! Top-rankings orchestration: chunked fetch, then enrichment

use std::sync::Arc;
use tokio::time::Instant;
use tracing::info;

use crate::enrich::ProfileEnricher;
use crate::error::RankingError;
use crate::fetcher::ChunkedFetcher;
use crate::observer::{EnrichOutcome, EnrichScope, NoopObserver, RankingObserver, RequestOutcome};
use crate::pool::PoolStatus;
use crate::record::EnrichedRecord;

/// Request shaping for [`RankingService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingSettings {
    /// Rows per windowed query
    pub chunk_size: usize,
    /// Limit used when the caller gives none
    pub default_limit: usize,
    /// Largest limit a caller may request
    pub max_limit: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            default_limit: 10,
            max_limit: 10_000,
        }
    }
}

pub struct RankingService {
    fetcher: ChunkedFetcher,
    enricher: ProfileEnricher,
    settings: RankingSettings,
    observer: Arc<dyn RankingObserver>,
}

impl RankingService {
    pub fn new(fetcher: ChunkedFetcher, enricher: ProfileEnricher, settings: RankingSettings) -> Self {
        Self {
            fetcher,
            enricher,
            settings,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Install one observer for both the request hooks and the chunk hooks
    pub fn with_observer(mut self, observer: Arc<dyn RankingObserver>) -> Self {
        self.fetcher = self.fetcher.with_observer(observer.clone());
        self.observer = observer;
        self
    }

    pub fn settings(&self) -> &RankingSettings {
        &self.settings
    }

    pub fn pool_status(&self) -> PoolStatus {
        self.fetcher.pool().status()
    }

    /// The top `limit` users by best score, enriched with profile fields.
    ///
    /// Wall-clock duration is reported to the observer whether the request
    /// succeeds or fails.
    pub async fn top_rankings(&self, limit: usize) -> Result<Vec<EnrichedRecord>, RankingError> {
        if limit > self.settings.max_limit {
            return Err(RankingError::LimitTooLarge {
                requested: limit,
                max: self.settings.max_limit,
            });
        }

        info!(limit, "Fetching top rankings");
        let started = Instant::now();
        let result = self.fetch_and_enrich(limit).await;
        let elapsed = started.elapsed();

        let outcome = match &result {
            Ok(rankings) => RequestOutcome::Completed {
                results: rankings.len(),
            },
            Err(err) => RequestOutcome::Failed { stage: err.stage() },
        };
        self.observer.on_request_complete(limit, elapsed, outcome);

        result
    }

    async fn fetch_and_enrich(&self, limit: usize) -> Result<Vec<EnrichedRecord>, RankingError> {
        let records = self.fetcher.fetch(limit, self.settings.chunk_size).await?;

        let scope = EnrichScope::enter(self.observer.as_ref(), records.len());
        match self.enricher.enrich(Some(records.as_slice())) {
            Ok(enriched) => {
                scope.finish(EnrichOutcome::Completed {
                    records: enriched.len(),
                });
                Ok(enriched)
            }
            Err(err) => {
                scope.finish(EnrichOutcome::Failed);
                Err(err.into())
            }
        }
    }
}
