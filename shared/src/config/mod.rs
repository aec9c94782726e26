//! Configuration module with one sub-module per concern
//!
//! - `database` - MySQL connection and pool configuration
//! - `environment` - Deployment environment and logging configuration
//! - `queue` - Redis queue transport and queue names
//! - `server` - HTTP server for the validation endpoint
//! - `verification` - Code TTL and expiry cleanup cadence

pub mod database;
pub mod environment;
pub mod queue;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use queue::QueueConfig;
pub use server::ServerConfig;
pub use verification::{CleanupConfig, VerificationConfig, MAX_CODE_TTL_MINUTES};

/// Prefix for environment variable overrides, e.g. `VP__DATABASE__URL`
pub const ENV_PREFIX: &str = "VP";

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Queue transport configuration
    pub queue: QueueConfig,

    /// Code issuing and validation settings
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Expiry cleanup settings
    #[serde(default)]
    pub cleanup: CleanupConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Defaults for the given environment
    pub fn for_environment(environment: Environment) -> Self {
        let database = match environment {
            Environment::Production => {
                DatabaseConfig::new("mysql://prod-db:3306/verification_provider")
                    .with_max_connections(50)
            }
            _ => DatabaseConfig::default(),
        };

        Self {
            environment,
            server: ServerConfig::default(),
            database,
            queue: QueueConfig::default(),
            verification: VerificationConfig::default(),
            cleanup: CleanupConfig::default(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Build configuration purely from conventional environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            queue: QueueConfig::from_env(),
            verification: VerificationConfig::from_env(),
            cleanup: CleanupConfig::from_env(),
            logging: LoggingConfig::for_environment(environment),
        }
    }

    /// Load layered configuration
    ///
    /// Layers, lowest precedence first:
    /// 1. environment defaults
    /// 2. `config.<environment>.toml` in the working directory (optional)
    /// 3. `VP__<SECTION>__<KEY>` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let defaults = Self::for_environment(environment);

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&defaults)?)
            .add_source(config::File::with_name(&environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject values the services cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verification.code_ttl_minutes <= 0 {
            return Err(ConfigError::invalid(
                "verification.code_ttl_minutes",
                "must be greater than zero",
            ));
        }
        if self.verification.code_ttl_minutes > MAX_CODE_TTL_MINUTES {
            return Err(ConfigError::invalid(
                "verification.code_ttl_minutes",
                format!("must not exceed {} minutes", MAX_CODE_TTL_MINUTES),
            ));
        }
        if self.cleanup.enabled && self.cleanup.interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "cleanup.interval_seconds",
                "must be greater than zero when cleanup is enabled",
            ));
        }
        if self.queue.verification_queue.trim().is_empty() {
            return Err(ConfigError::invalid("queue.verification_queue", "must not be empty"));
        }
        if self.queue.email_queue.trim().is_empty() {
            return Err(ConfigError::invalid("queue.email_queue", "must not be empty"));
        }
        if self.queue.verification_queue == self.queue.email_queue {
            return Err(ConfigError::invalid(
                "queue.email_queue",
                "must differ from queue.verification_queue",
            ));
        }
        if self.queue.receive_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "queue.receive_timeout_seconds",
                "must be greater than zero",
            ));
        }
        if self.queue.connection_timeout == 0 {
            return Err(ConfigError::invalid(
                "queue.connection_timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
