//! Ranksurge server
//!
//! Wires configuration, logging, the SQLite score store, the bounded pool and
//! the ranking service into one axum application.

pub mod bridges;
pub mod startup;

// Re-export main components
pub use startup::Server;
