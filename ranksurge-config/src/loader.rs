//! Configuration loading and environment variable handling

use crate::domains::RanksurgeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "RANKSURGE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<RanksurgeConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: RanksurgeConfig = serde_yaml::from_str(&content)?;

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config)?;

        // Validate all domains
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<RanksurgeConfig> {
        let mut config = RanksurgeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<RanksurgeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut RanksurgeConfig) -> ConfigResult<()> {
        self.apply_server_overrides(&mut config.server)?;
        self.apply_database_overrides(&mut config.database)?;
        self.apply_ranking_overrides(&mut config.ranking)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply server config overrides
    fn apply_server_overrides(
        &self,
        config: &mut crate::domains::server::ServerConfig,
    ) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Some(port) = self.parse_env_var("SERVER_PORT")? {
            config.port = port;
        }

        if let Ok(name) = self.get_env_var("SERVICE_NAME") {
            config.service_name = name;
        }

        Ok(())
    }

    /// Apply database config overrides
    fn apply_database_overrides(
        &self,
        config: &mut crate::domains::database::DatabaseConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("DATABASE_URL") {
            config.url = url;
        }

        if let Some(max) = self.parse_env_var("DATABASE_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }

        if let Some(millis) = self.parse_env_var::<u64>("DATABASE_ACQUIRE_TIMEOUT_MS")? {
            config.acquire_timeout = Duration::from_millis(millis);
        }

        if let Some(rows) = self.parse_env_var("DATABASE_SEED_ROWS")? {
            config.seed_rows = rows;
        }

        Ok(())
    }

    /// Apply ranking config overrides
    fn apply_ranking_overrides(
        &self,
        config: &mut crate::domains::ranking::RankingConfig,
    ) -> ConfigResult<()> {
        if let Some(chunk_size) = self.parse_env_var("RANKING_CHUNK_SIZE")? {
            config.chunk_size = chunk_size;
        }

        if let Some(max_limit) = self.parse_env_var("RANKING_MAX_LIMIT")? {
            config.max_limit = max_limit;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Parse a prefixed environment variable if it is set
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::logging::{LogFormat, LogLevel};
    use std::io::Write;

    #[test]
    fn test_from_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\ndatabase:\n  max_connections: 4\n  acquire_timeout: 1s"
        )
        .unwrap();

        temp_env::with_vars(
            [
                ("RSTEST_DATABASE_MAX_CONNECTIONS", Some("2")),
                ("RSTEST_LOG_FORMAT", Some("json")),
            ],
            || {
                let config = ConfigLoader::with_prefix("RSTEST")
                    .from_file(file.path())
                    .unwrap();
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.database.max_connections, 2);
                assert_eq!(config.database.acquire_timeout, Duration::from_secs(1));
                assert_eq!(config.logging.format, LogFormat::Json);
            },
        );
    }

    #[test]
    fn test_from_env_only() {
        temp_env::with_vars(
            [
                ("RSENV_DATABASE_URL", Some("sqlite::memory:")),
                ("RSENV_DATABASE_ACQUIRE_TIMEOUT_MS", Some("250")),
                ("RSENV_RANKING_CHUNK_SIZE", Some("5")),
                ("RSENV_LOG_LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::with_prefix("RSENV").from_env().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.acquire_timeout, Duration::from_millis(250));
                assert_eq!(config.ranking.chunk_size, 5);
                assert_eq!(config.logging.level, LogLevel::Debug);
            },
        );
    }

    #[test]
    fn test_invalid_env_value_is_reported() {
        temp_env::with_var("RSBAD_SERVER_PORT", Some("not-a-port"), || {
            let err = ConfigLoader::with_prefix("RSBAD").from_env().unwrap_err();
            assert!(matches!(err, ConfigError::EnvError(_)));
            assert!(err.to_string().contains("SERVER_PORT"));
        });
    }

    #[test]
    fn test_env_override_is_validated() {
        temp_env::with_var("RSZERO_RANKING_CHUNK_SIZE", Some("0"), || {
            let err = ConfigLoader::with_prefix("RSZERO").from_env().unwrap_err();
            assert!(matches!(err, ConfigError::DomainError { .. }));
        });
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ConfigLoader::new()
            .load(Some("/nonexistent/ranksurge.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError(_)));
    }
}
