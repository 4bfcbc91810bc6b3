//! Error types for each stage of a ranking request

use std::time::Duration;
use thiserror::Error;

/// Result type for score store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while acquiring a pooled connection
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolError {
    /// Every connection stayed busy for the whole acquisition timeout
    #[error("connection pool exhausted: all {capacity} connections busy after waiting {timeout:?}")]
    Exhausted { capacity: usize, timeout: Duration },

    /// A permit was granted but no idle connection was left behind it
    #[error("connection pool has no idle connection to hand out")]
    Closed,
}

/// Errors raised by a score store backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to open store connection: {message}")]
    Connection { message: String },

    #[error("windowed ranking query failed: {message}")]
    Query { message: String },

    #[error("schema setup failed: {message}")]
    Schema { message: String },
}

impl StoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        StoreError::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        StoreError::Query {
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        StoreError::Schema {
            message: message.into(),
        }
    }
}

/// Errors raised by the chunked fetch. The first failing chunk aborts the
/// whole fetch and nothing read before it is returned.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,

    #[error("chunk {chunk_index}: could not acquire a pooled connection: {source}")]
    Acquire {
        chunk_index: usize,
        #[source]
        source: PoolError,
    },

    #[error("chunk {chunk_index}: {source}")]
    Chunk {
        chunk_index: usize,
        #[source]
        source: StoreError,
    },
}

impl FetchError {
    /// Zero-based index of the chunk that failed, if the failure belongs to one
    pub fn chunk_index(&self) -> Option<usize> {
        match self {
            FetchError::InvalidChunkSize => None,
            FetchError::Acquire { chunk_index, .. } | FetchError::Chunk { chunk_index, .. } => {
                Some(*chunk_index)
            }
        }
    }

    /// Whether this failure is a pool acquisition timeout
    pub fn is_pool_exhausted(&self) -> bool {
        matches!(
            self,
            FetchError::Acquire {
                source: PoolError::Exhausted { .. },
                ..
            }
        )
    }
}

/// Errors raised by profile enrichment
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("invalid enrichment input: {0}")]
    InvalidInput(String),
}

/// Pipeline stage a ranking error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingStage {
    Validate,
    Fetch,
    Enrich,
}

impl RankingStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingStage::Validate => "validate",
            RankingStage::Fetch => "fetch",
            RankingStage::Enrich => "enrich",
        }
    }
}

impl std::fmt::Display for RankingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level ranking error, wrapped once with the stage it came from
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("requested limit {requested} exceeds the maximum of {max}")]
    LimitTooLarge { requested: usize, max: usize },

    #[error("fetch stage failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("enrich stage failed: {0}")]
    Enrich(#[from] EnrichError),
}

impl RankingError {
    pub fn stage(&self) -> RankingStage {
        match self {
            RankingError::LimitTooLarge { .. } => RankingStage::Validate,
            RankingError::Fetch(_) => RankingStage::Fetch,
            RankingError::Enrich(_) => RankingStage::Enrich,
        }
    }
}
