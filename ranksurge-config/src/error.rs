//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading configuration file
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvError(String),

    /// Domain-specific configuration error
    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_errors_convert_to_parse_error() {
        let yaml_err = serde_yaml::from_str::<Vec<u32>>("not: [a list").unwrap_err();
        let err: ConfigError = yaml_err.into();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_domain_error_names_the_domain() {
        let err = ConfigError::DomainError {
            domain: "ranking.delay".to_string(),
            message: "elevated must be above base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Domain configuration error in ranking.delay: elevated must be above base"
        );
    }
}
