//! Health check endpoints

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use tracing::debug;

use crate::app::AppContext;

/// Liveness response body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

/// Health check endpoint
pub async fn health_check(State(ctx): State<AppContext>) -> impl IntoResponse {
    debug!("Health check requested");

    Json(HealthResponse {
        status: "healthy",
        service: ctx.service_name.to_string(),
    })
}

/// Current connection pool occupancy
pub async fn pool_health(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(ctx.rankings.pool_status())
}
