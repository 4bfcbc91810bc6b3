//! Score store abstraction (object-safe)

use async_trait::async_trait;

use crate::chunk::ChunkWindow;
use crate::error::StoreResult;
use crate::record::Record;

/// One open connection to the ranked-score store.
///
/// The only query it serves is the windowed ranking: rows grouped by user,
/// best score and latest timestamp per user, ordered by score descending
/// (ties by user id ascending), then `LIMIT`/`OFFSET` applied from the window.
#[async_trait]
pub trait ScoreConnection: Send {
    async fn fetch_window(&mut self, window: ChunkWindow) -> StoreResult<Vec<Record>>;
}

/// Factory for store connections, used to fill a [`crate::ResourcePool`]
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Short backend name stamped on every produced [`Record`]
    fn backend(&self) -> &'static str;

    async fn connect(&self) -> StoreResult<Box<dyn ScoreConnection>>;
}
