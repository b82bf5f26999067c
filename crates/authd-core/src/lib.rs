//! authd core - configuration and shared error types
//!
//! This crate defines the pieces shared by every authd component:
//! - Configuration management (environment, TOML files, defaults)
//! - The core error taxonomy used at service boundaries

pub mod config;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};

use thiserror::Error;

/// Core error taxonomy for account and credential operations
///
/// Handlers translate these into HTTP status codes; the variants map the
/// failure classes the service distinguishes, not transport concerns.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::Validation("email is malformed".to_string());
        assert_eq!(err.to_string(), "Validation error: email is malformed");

        let err = CoreError::Authentication("bad credentials".to_string());
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: CoreError = ConfigError::MissingRequired("TOKEN_SIGN_SECRET".to_string()).into();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
