//! Persistent score store for ranksurge
//!
//! [`SqliteScoreStore`] implements [`ranksurge_core::ScoreStore`] over SQLite
//! using sqlx. It owns the schema, can seed synthetic demo scores, and opens
//! the dedicated connections that fill a [`ranksurge_core::ResourcePool`].

pub mod seed;
pub mod sqlite;

pub use seed::SeedPlan;
pub use sqlite::SqliteScoreStore;
