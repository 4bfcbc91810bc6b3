//! In-memory score store for tests and demos

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::chunk::ChunkWindow;
use crate::error::{StoreError, StoreResult};
use crate::record::Record;
use crate::store::{ScoreConnection, ScoreStore};

const BACKEND: &str = "memory";

#[derive(Debug, Clone)]
struct ScoreRow {
    user_id: String,
    score: Option<i64>,
    created_at: i64,
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<ScoreRow>,
    fail_at_offset: Option<usize>,
}

/// Score store backed by a shared vector of raw score rows.
///
/// Clones share the same rows, so rows inserted after the pool was filled
/// are visible to every pooled connection.
#[derive(Clone, Default)]
pub struct MemoryScoreStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every window starting at `offset` fail with a query error
    pub fn with_failure_at_offset(self, offset: usize) -> Self {
        self.state.write().fail_at_offset = Some(offset);
        self
    }

    pub fn insert(&self, user_id: impl Into<String>, score: Option<i64>, created_at: i64) {
        self.state.write().rows.push(ScoreRow {
            user_id: user_id.into(),
            score,
            created_at,
        });
    }

    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full single-shot ranking truncated to `limit`
    pub fn top(&self, limit: usize) -> Vec<Record> {
        let mut ranking = self.ranking();
        ranking.truncate(limit);
        ranking
    }

    fn ranking(&self) -> Vec<Record> {
        let state = self.state.read();

        let mut best: BTreeMap<&str, (Option<i64>, i64)> = BTreeMap::new();
        for row in &state.rows {
            let entry = best
                .entry(row.user_id.as_str())
                .or_insert((row.score, row.created_at));
            // Option ordering puts None below any score, like SQL MAX ignoring NULL
            entry.0 = entry.0.max(row.score);
            entry.1 = entry.1.max(row.created_at);
        }

        let mut ranking: Vec<Record> = best
            .into_iter()
            .map(|(user_id, (score, created_at))| Record::new(user_id, score, created_at, BACKEND))
            .collect();
        // BTreeMap order already breaks ties by user id ascending; the sort is stable
        ranking.sort_by(|a, b| b.score.cmp(&a.score));
        ranking
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn connect(&self) -> StoreResult<Box<dyn ScoreConnection>> {
        Ok(Box::new(MemoryScoreConnection {
            store: self.clone(),
        }))
    }
}

struct MemoryScoreConnection {
    store: MemoryScoreStore,
}

#[async_trait]
impl ScoreConnection for MemoryScoreConnection {
    async fn fetch_window(&mut self, window: ChunkWindow) -> StoreResult<Vec<Record>> {
        if self.store.state.read().fail_at_offset == Some(window.offset) {
            return Err(StoreError::query(format!(
                "injected failure at offset {}",
                window.offset
            )));
        }

        Ok(self
            .store
            .ranking()
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect())
    }
}
