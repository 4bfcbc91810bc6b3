//! Score store and connection pool configuration

use crate::domains::utils::default_true;
use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Fixed number of pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a chunk waits for a free connection
    #[serde(with = "humantime_serde", default = "default_acquire_timeout")]
    pub acquire_timeout: Duration,

    /// Create the scores table on startup
    #[serde(default = "default_true")]
    pub create_schema: bool,

    /// Synthetic score rows to insert when the table is empty
    #[serde(default)]
    pub seed_rows: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            acquire_timeout: default_acquire_timeout(),
            create_schema: true,
            seed_rows: 0,
        }
    }
}

impl Validatable for DatabaseConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.url, "url", self.domain_name())?;
        validate_positive(self.max_connections, "max_connections", self.domain_name())?;

        if self.acquire_timeout.is_zero() {
            return Err(self.validation_error("acquire_timeout must be greater than 0"));
        }

        if !self.url.starts_with("sqlite:") {
            return Err(self.validation_error(format!(
                "Unsupported database URL '{}', expected a sqlite: URL",
                self.url
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "database"
    }
}

fn default_database_url() -> String {
    "sqlite://ranksurge.db".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> Duration {
    Duration::from_secs(3)
}
