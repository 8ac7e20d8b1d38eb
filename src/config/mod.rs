pub mod app;
pub mod auth;

use thiserror::Error;

pub use app::{
    AppConfig, AppMetadata, DatabaseConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
};
pub use auth::{Argon2Config, AuthConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Sanity checks run once the layered sources have been merged
pub trait Validate {
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Load the application configuration from files and environment variables
pub fn load() -> Result<AppConfig, ConfigError> {
    app::load_config()
}
