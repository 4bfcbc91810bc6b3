//! Observation hooks around chunks, enrichment and whole requests
//!
//! The fetch and enrichment code never talks to a tracing backend directly.
//! It calls a [`RankingObserver`], which may emit log lines, span tags or
//! metrics, or nothing at all.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::chunk::{ChunkPlan, ChunkWindow};
use crate::error::RankingStage;

/// How a single chunk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    Completed { rows: usize },
    AcquireFailed,
    ReadFailed,
}

/// How an enrichment pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichOutcome {
    Completed { records: usize },
    Failed,
    /// The scope was dropped without being finished (panic or cancellation)
    Abandoned,
}

/// How a whole ranking request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Completed { results: usize },
    Failed { stage: RankingStage },
}

/// Side-channel hooks. Every method defaults to doing nothing.
pub trait RankingObserver: Send + Sync {
    fn on_chunk_start(&self, _plan: &ChunkPlan, _window: &ChunkWindow, _hold: Duration) {}

    fn on_chunk_end(&self, _window: &ChunkWindow, _outcome: ChunkOutcome, _elapsed: Duration) {}

    fn on_enrich_start(&self, _records: usize) {}

    fn on_enrich_end(&self, _outcome: EnrichOutcome) {}

    fn on_request_complete(&self, _limit: usize, _elapsed: Duration, _outcome: RequestOutcome) {}
}

/// Observer that ignores every hook
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RankingObserver for NoopObserver {}

/// Observer that turns hooks into `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RankingObserver for TracingObserver {
    fn on_chunk_start(&self, plan: &ChunkPlan, window: &ChunkWindow, hold: Duration) {
        debug!(
            chunk = window.index + 1,
            total_chunks = plan.total_chunks(),
            offset = window.offset,
            limit = window.limit,
            hold_ms = hold.as_millis() as u64,
            "Starting chunk"
        );
    }

    fn on_chunk_end(&self, window: &ChunkWindow, outcome: ChunkOutcome, elapsed: Duration) {
        match outcome {
            ChunkOutcome::Completed { rows } => debug!(
                chunk = window.index + 1,
                rows,
                elapsed_ms = elapsed.as_millis() as u64,
                "Chunk completed"
            ),
            ChunkOutcome::AcquireFailed => warn!(
                chunk = window.index + 1,
                elapsed_ms = elapsed.as_millis() as u64,
                "Chunk could not acquire a connection, pool exhausted"
            ),
            ChunkOutcome::ReadFailed => warn!(
                chunk = window.index + 1,
                elapsed_ms = elapsed.as_millis() as u64,
                "Chunk read failed"
            ),
        }
    }

    fn on_enrich_start(&self, records: usize) {
        debug!(records, "Enriching ranking records");
    }

    fn on_enrich_end(&self, outcome: EnrichOutcome) {
        match outcome {
            EnrichOutcome::Completed { records } => debug!(records, "Enrichment completed"),
            EnrichOutcome::Failed => warn!("Enrichment failed"),
            EnrichOutcome::Abandoned => warn!("Enrichment abandoned before completion"),
        }
    }

    fn on_request_complete(&self, limit: usize, elapsed: Duration, outcome: RequestOutcome) {
        match outcome {
            RequestOutcome::Completed { results } => info!(
                limit,
                results,
                elapsed_ms = elapsed.as_millis() as u64,
                "Ranking request completed"
            ),
            RequestOutcome::Failed { stage } => error!(
                limit,
                stage = stage.as_str(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Ranking request failed"
            ),
        }
    }
}

/// Scoped enrichment hook: `on_enrich_start` on entry, `on_enrich_end` on
/// every exit path.
pub(crate) struct EnrichScope<'a> {
    observer: &'a dyn RankingObserver,
    outcome: EnrichOutcome,
}

impl<'a> EnrichScope<'a> {
    pub(crate) fn enter(observer: &'a dyn RankingObserver, records: usize) -> Self {
        observer.on_enrich_start(records);
        Self {
            observer,
            outcome: EnrichOutcome::Abandoned,
        }
    }

    pub(crate) fn finish(mut self, outcome: EnrichOutcome) {
        self.outcome = outcome;
    }
}

impl Drop for EnrichScope<'_> {
    fn drop(&mut self) {
        self.observer.on_enrich_end(self.outcome);
    }
}
