//! Sequential, chunked ranking fetch over a bounded pool

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::chunk::{ChunkPlan, ChunkWindow};
use crate::delay::DelayShaper;
use crate::error::FetchError;
use crate::observer::{ChunkOutcome, NoopObserver, RankingObserver};
use crate::pool::ResourcePool;
use crate::record::Record;
use crate::store::ScoreConnection;

const DEFAULT_HIGH_CHUNK_WARNING_THRESHOLD: usize = 20;

/// Reads a ranking window by window, one pooled connection per window.
///
/// Windows run strictly one after another on the calling task. Each window
/// holds its connection for at least the shaped delay, so a request keeps a
/// pool slot busy for the cumulative delay of all of its chunks.
pub struct ChunkedFetcher {
    pool: ResourcePool<Box<dyn ScoreConnection>>,
    shaper: DelayShaper,
    observer: Arc<dyn RankingObserver>,
    high_chunk_warning_threshold: usize,
}

impl ChunkedFetcher {
    pub fn new(pool: ResourcePool<Box<dyn ScoreConnection>>, shaper: DelayShaper) -> Self {
        Self {
            pool,
            shaper,
            observer: Arc::new(NoopObserver),
            high_chunk_warning_threshold: DEFAULT_HIGH_CHUNK_WARNING_THRESHOLD,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn RankingObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Chunk counts above this log a warning before the fetch starts
    pub fn with_high_chunk_warning_threshold(mut self, threshold: usize) -> Self {
        self.high_chunk_warning_threshold = threshold;
        self
    }

    pub fn pool(&self) -> &ResourcePool<Box<dyn ScoreConnection>> {
        &self.pool
    }

    pub fn shaper(&self) -> &DelayShaper {
        &self.shaper
    }

    /// Fetch the top `requested_limit` rows in `chunk_size` windows.
    ///
    /// All or nothing: the first failing chunk aborts the fetch and the rows
    /// read so far are dropped. Nothing is retried.
    pub async fn fetch(
        &self,
        requested_limit: usize,
        chunk_size: usize,
    ) -> Result<Vec<Record>, FetchError> {
        let plan = ChunkPlan::new(requested_limit, chunk_size)?;
        let tier = self.shaper.tier(plan.total_chunks());

        info!(
            requested_limit,
            chunk_size,
            total_chunks = plan.total_chunks(),
            tier = %tier,
            "Paginating ranking query"
        );
        if plan.total_chunks() > self.high_chunk_warning_threshold {
            warn!(
                total_chunks = plan.total_chunks(),
                threshold = self.high_chunk_warning_threshold,
                pool_capacity = self.pool.capacity(),
                "High chunk count, concurrent callers can exhaust the connection pool"
            );
        }

        let mut rows = Vec::new();
        for window in plan.windows() {
            let hold = self.shaper.delay(window.index, plan.total_chunks());
            self.observer.on_chunk_start(&plan, &window, hold);

            let started = Instant::now();
            let result = self.fetch_chunk(window, hold).await;
            let elapsed = started.elapsed();

            match result {
                Ok(chunk_rows) => {
                    self.observer.on_chunk_end(
                        &window,
                        ChunkOutcome::Completed {
                            rows: chunk_rows.len(),
                        },
                        elapsed,
                    );
                    rows.extend(chunk_rows);
                }
                Err(err) => {
                    let outcome = match &err {
                        FetchError::Acquire { .. } => ChunkOutcome::AcquireFailed,
                        _ => ChunkOutcome::ReadFailed,
                    };
                    self.observer.on_chunk_end(&window, outcome, elapsed);
                    return Err(err);
                }
            }
        }

        info!(rows = rows.len(), "Ranking query finished");
        Ok(rows)
    }

    async fn fetch_chunk(
        &self,
        window: ChunkWindow,
        hold: Duration,
    ) -> Result<Vec<Record>, FetchError> {
        let mut handle =
            self.pool
                .acquire_default()
                .await
                .map_err(|source| FetchError::Acquire {
                    chunk_index: window.index,
                    source,
                })?;

        let (result, ()) = tokio::join!(
            handle.fetch_window(window),
            tokio::time::sleep(hold)
        );
        // Released before the outcome is inspected, success or not
        handle.release();

        result.map_err(|source| FetchError::Chunk {
            chunk_index: window.index,
            source,
        })
    }
}
