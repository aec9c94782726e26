//! Deployment environment and logging settings

use serde::{Deserialize, Serialize};
use std::env;

/// Where the provider is running; selects config defaults and the optional
/// `config.<environment>.toml` overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Read `ENVIRONMENT`, then `ENV`, then `RUST_ENV`
    ///
    /// Missing or unrecognised values fall back to development.
    pub fn from_env() -> Self {
        ["ENVIRONMENT", "ENV", "RUST_ENV"]
            .iter()
            .find_map(|key| env::var(key).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Overlay file layered over the defaults by `AppConfig::load`
    pub fn config_file(&self) -> String {
        format!("config.{}.toml", self)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Tracing subscriber settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,

    /// ANSI colours in terminal output
    #[serde(default)]
    pub colored: bool,

    /// Include file and line of each event
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Pretty, verbose output locally; JSON lines wherever logs are shipped
    ///
    /// sqlx logs every statement at debug, so it is held at warn outside
    /// development to keep one line per queue message.
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug,sqlx=info"),
                format: LogFormat::Pretty,
                colored: true,
                source_location: true,
            },
            Environment::Staging | Environment::Production => Self {
                level: String::from("info,sqlx=warn"),
                format: LogFormat::Json,
                colored: false,
                source_location: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!("invalid".parse::<Environment>().is_err());
    }

    #[test]
    fn test_config_file_follows_environment_name() {
        assert_eq!(Environment::Development.config_file(), "config.development.toml");
        assert_eq!(Environment::Production.config_file(), "config.production.toml");
    }

    #[test]
    fn test_deployed_environments_log_json_and_quiet_sqlx() {
        for env in [Environment::Staging, Environment::Production] {
            let logging = LoggingConfig::for_environment(env);
            assert_eq!(logging.format, LogFormat::Json);
            assert!(!logging.colored);
            assert!(logging.level.contains("sqlx=warn"));
        }

        let dev = LoggingConfig::default();
        assert_eq!(dev.format, LogFormat::Pretty);
        assert!(dev.source_location);
    }
}
