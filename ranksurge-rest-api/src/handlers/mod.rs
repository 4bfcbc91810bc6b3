//! HTTP request handlers

pub mod health;
pub mod rankings;

pub use health::{health_check, pool_health};
pub use rankings::{top_rankings, TopRankingsQuery};
