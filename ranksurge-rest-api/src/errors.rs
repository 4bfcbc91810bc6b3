//! REST API error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ranksurge_core::{FetchError, RankingError};
use serde_json::json;
use thiserror::Error;

/// REST API specific error type
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Ranking(#[from] RankingError),
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

impl RestError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RestError::Ranking(RankingError::LimitTooLarge { .. })
            | RestError::Ranking(RankingError::Enrich(_)) => StatusCode::BAD_REQUEST,
            RestError::Ranking(RankingError::Fetch(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            RestError::BadRequest(_) => "BAD_REQUEST",
            RestError::Ranking(RankingError::LimitTooLarge { .. }) => "LIMIT_TOO_LARGE",
            RestError::Ranking(RankingError::Enrich(_)) => "INVALID_INPUT",
            RestError::Ranking(RankingError::Fetch(err)) if err.is_pool_exhausted() => {
                "POOL_EXHAUSTED"
            }
            RestError::Ranking(RankingError::Fetch(FetchError::InvalidChunkSize)) => {
                "INTERNAL_ERROR"
            }
            RestError::Ranking(RankingError::Fetch(_)) => "CHUNK_FETCH_FAILED",
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest(message.into())
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut error = json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        if let RestError::Ranking(err) = &self {
            error["stage"] = json!(err.stage().as_str());
            if let RankingError::Fetch(fetch) = err {
                if let Some(index) = fetch.chunk_index() {
                    error["chunk"] = json!(index);
                }
            }
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
