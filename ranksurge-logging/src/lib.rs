//! Logging setup for ranksurge
//!
//! Installs a global `tracing` subscriber whose filter and output format come
//! from [`ranksurge_config::LoggingConfig`]. Every initializer uses `try_init`,
//! so calling one after a subscriber is already installed is harmless.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
