//! Top rankings endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use ranksurge_core::EnrichedRecord;
use serde::Deserialize;
use tracing::info;

use crate::{
    app::AppContext,
    errors::{RestError, RestResult},
};

/// Query string for `GET /rankings/top`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopRankingsQuery {
    /// Kept as text so malformed values get the API's own 400 body
    pub limit: Option<String>,
}

impl TopRankingsQuery {
    /// The requested limit, or `default` when absent
    pub fn resolve_limit(&self, default: usize) -> RestResult<usize> {
        let Some(raw) = self.limit.as_deref() else {
            return Ok(default);
        };

        let value: i64 = raw.trim().parse().map_err(|_| {
            RestError::bad_request(format!("limit must be an integer, got '{}'", raw))
        })?;
        usize::try_from(value)
            .map_err(|_| RestError::bad_request(format!("limit must not be negative, got {}", value)))
    }
}

/// Top users by best score, fetched in chunks and enriched
pub async fn top_rankings(
    State(ctx): State<AppContext>,
    Query(query): Query<TopRankingsQuery>,
) -> RestResult<Json<Vec<EnrichedRecord>>> {
    let limit = query.resolve_limit(ctx.rankings.settings().default_limit)?;
    info!(limit, "Top rankings requested");

    let rankings = ctx.rankings.top_rankings(limit).await?;
    Ok(Json(rankings))
}
