//! Ranking rows as read from the store and as returned to callers

use serde::{Deserialize, Serialize};

/// One user's best score, as produced by a windowed ranking query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub user_id: String,
    /// Highest score seen for the user; `None` when every row was null
    pub score: Option<i64>,
    /// Latest row timestamp for the user, epoch milliseconds
    pub timestamp: i64,
    /// Backend that produced the row
    pub source: String,
}

impl Record {
    pub fn new(
        user_id: impl Into<String>,
        score: Option<i64>,
        timestamp: i64,
        source: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            score,
            timestamp,
            source: source.into(),
        }
    }
}

/// A record with profile fields attached. Serialized flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub profile_status: String,
    pub level: String,
}
