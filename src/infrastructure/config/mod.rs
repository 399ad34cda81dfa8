use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::domain::news::{Source, SourceError};
use crate::infrastructure::logging::LogSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Feed URLs polled on every cycle
    pub rss: Vec<String>,
    /// Seconds between enrichment cycles
    #[serde(default = "default_request_period")]
    pub request_period: u64,
    /// Seconds shutdown waits for running cycles
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("incorrect RSS URL '{url}': {source}")]
    InvalidSource {
        url: String,
        #[source]
        source: SourceError,
    },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_period() -> u64 {
    60
}

fn default_shutdown_grace() -> u64 {
    15
}

impl Config {
    /// Load from the JSON file named by `CONFIG_FILE`, or from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = match env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            host: env::var("HOST").unwrap_or_else(|_| default_host()),
            port: parse_var("PORT", default_port())?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| default_log_level()),
            log_format: env::var("LOG_FORMAT")
                .map(|s| match s.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })
                .unwrap_or_default(),
            rss: env::var("RSS_SOURCES")
                .map_err(|_| ConfigError::Missing("RSS_SOURCES"))?
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            request_period: parse_var("REQUEST_PERIOD", default_request_period())?,
            shutdown_grace_seconds: parse_var("SHUTDOWN_GRACE_SECONDS", default_shutdown_grace())?,
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_period == 0 {
            return Err(ConfigError::Invalid {
                name: "request_period",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.rss.is_empty() {
            return Err(ConfigError::Invalid {
                name: "rss",
                reason: "at least one source is required".to_string(),
            });
        }
        self.sources().map(|_| ())
    }

    /// Parse every configured URL. Any invalid entry fails the whole list.
    pub fn sources(&self) -> Result<Vec<Source>, ConfigError> {
        self.rss
            .iter()
            .map(|raw| {
                Source::parse(raw).map_err(|source| ConfigError::InvalidSource {
                    url: raw.clone(),
                    source,
                })
            })
            .collect()
    }

    pub fn request_period(&self) -> Duration {
        Duration::from_secs(self.request_period)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
