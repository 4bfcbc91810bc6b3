//! HTTP server configuration

use crate::domains::utils::default_true;
use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Emit a span per HTTP request
    #[serde(default = "default_true")]
    pub enable_tracing: bool,

    /// Cross-origin settings
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Cross-origin resource sharing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Whether a CORS layer is installed at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed origins; `*` allows any
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Allowed request methods
    #[serde(default = "default_allowed_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed request headers, including distributed tracing headers
    #[serde(default = "default_allowed_headers")]
    pub allowed_headers: Vec<String>,

    /// Response headers visible to browser clients
    #[serde(default = "default_exposed_headers")]
    pub exposed_headers: Vec<String>,

    /// Preflight cache duration
    #[serde(with = "humantime_serde", default = "default_max_age")]
    pub max_age: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            service_name: default_service_name(),
            enable_tracing: true,
            cors: CorsConfig::default(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: default_allowed_origins(),
            allowed_methods: default_allowed_methods(),
            allowed_headers: default_allowed_headers(),
            exposed_headers: default_exposed_headers(),
            max_age: default_max_age(),
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        validate_required_string(&self.service_name, "service_name", self.domain_name())?;
        self.cors.validate()?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

impl Validatable for CorsConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.allowed_origins.is_empty() {
            return Err(self.validation_error("allowed_origins cannot be empty when CORS is enabled"));
        }

        let valid_methods = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];
        for method in &self.allowed_methods {
            if !valid_methods.contains(&method.to_uppercase().as_str()) {
                return Err(self.validation_error(format!(
                    "Invalid HTTP method '{}', must be one of: {:?}",
                    method, valid_methods
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server.cors"
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_service_name() -> String {
    "ranksurge".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_allowed_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_allowed_headers() -> Vec<String> {
    [
        "content-type",
        "authorization",
        "x-datadog-trace-id",
        "x-datadog-parent-id",
        "x-datadog-origin",
        "x-datadog-sampling-priority",
        "traceparent",
        "tracestate",
        "b3",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect()
}

fn default_exposed_headers() -> Vec<String> {
    ["x-datadog-trace-id", "x-datadog-parent-id", "traceparent"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

fn default_max_age() -> Option<Duration> {
    Some(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.enable_tracing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cors_defaults_carry_trace_headers() {
        let cors = CorsConfig::default();
        assert_eq!(cors.allowed_origins, vec!["*"]);
        assert!(cors.allowed_headers.iter().any(|h| h == "traceparent"));
        assert!(cors.allowed_headers.iter().any(|h| h == "x-datadog-trace-id"));
        assert!(cors.exposed_headers.iter().any(|h| h == "x-datadog-parent-id"));
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.service_name = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_validation() {
        let mut cors = CorsConfig::default();
        cors.allowed_methods.push("TELEPORT".to_string());
        assert!(cors.validate().is_err());

        cors.enabled = false;
        assert!(cors.validate().is_ok());

        let mut cors = CorsConfig::default();
        cors.allowed_origins.clear();
        assert!(cors.validate().is_err());
    }
}
