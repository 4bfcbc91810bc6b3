//! Domain-driven configuration management for ranksurge
//!
//! Configuration is split by functional domain, each with its own defaults
//! and validation, and can be loaded from YAML with environment overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    database::DatabaseConfig,
    enrichment::{CorrectionConfig, EnrichmentConfig, LevelConfig},
    logging::{LogFormat, LogLevel, LoggingConfig},
    ranking::{DelayConfig, RankingConfig},
    server::{CorsConfig, ServerConfig},
    RanksurgeConfig,
};
