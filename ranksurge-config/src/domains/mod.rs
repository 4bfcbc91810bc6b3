//! Domain-specific configuration modules

pub mod database;
pub mod enrichment;
pub mod logging;
pub mod ranking;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main ranksurge configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RanksurgeConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Score store and connection pool configuration
    #[serde(default)]
    pub database: database::DatabaseConfig,

    /// Chunked fetch and delay shaping configuration
    #[serde(default)]
    pub ranking: ranking::RankingConfig,

    /// Profile enrichment rules
    #[serde(default)]
    pub enrichment: enrichment::EnrichmentConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl RanksurgeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.ranking.validate()?;
        self.enrichment.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = RanksurgeConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RanksurgeConfig::default().validate_all().is_ok());
    }

    #[test]
    fn test_sample_round_trips() {
        let sample = RanksurgeConfig::generate_sample();
        let parsed: RanksurgeConfig = serde_yaml::from_str(&sample).unwrap();
        assert_eq!(parsed, RanksurgeConfig::default());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
database:
  max_connections: 3
ranking:
  delay:
    base: 10ms
"#;
        let config: RanksurgeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.database.max_connections, 3);
        assert_eq!(config.ranking.delay.base, std::time::Duration::from_millis(10));
        assert_eq!(config.ranking.chunk_size, 10);
        assert_eq!(config.server, server::ServerConfig::default());
    }
}
