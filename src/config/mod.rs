//! Typed configuration from environment variables and an optional TOML file.
//!
//! Loads once at startup. Environment values win over file values.
//! The database URL is wrapped in secrecy::SecretString to keep it out of logs.

pub mod secrets;

use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::db::DEFAULT_QUEUE;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Config {
    pub database_url: Option<SecretString>,
    pub queue_name: String,
    pub host: String,
    pub port: u16,
    pub store_timeout: Duration,
    pub queue_timeout: Duration,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

/// Keys accepted in the TOML file. All optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub queue_name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub store_timeout_ms: Option<u64>,
    pub queue_timeout_ms: Option<u64>,
    pub otel_endpoint: Option<String>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("bad config file {}: {e}", path.display())))
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::resolve(FileConfig::default(), |name| std::env::var(name).ok())
    }

    /// Load `path` (if given), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => FileConfig::from_path(p)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Merge file values with a variable lookup. The lookup wins.
    pub fn resolve(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_timeout_ms = parsed(&lookup, "STORE_TIMEOUT_MS")?
            .or(file.store_timeout_ms)
            .unwrap_or(5_000);
        let queue_timeout_ms = parsed(&lookup, "QUEUE_TIMEOUT_MS")?
            .or(file.queue_timeout_ms)
            .unwrap_or(5_000);
        if store_timeout_ms == 0 || queue_timeout_ms == 0 {
            return Err(Error::Config("timeouts must be greater than zero".to_string()));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .or(file.database_url)
                .map(SecretString::from),
            queue_name: lookup("QUEUE_NAME")
                .or(file.queue_name)
                .unwrap_or_else(|| DEFAULT_QUEUE.to_string()),
            host: lookup("HOST")
                .or(file.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed(&lookup, "PORT")?.or(file.port).unwrap_or(3000),
            store_timeout: Duration::from_millis(store_timeout_ms),
            queue_timeout: Duration::from_millis(queue_timeout_ms),
            otel_endpoint: lookup("OTEL_ENDPOINT").or(file.otel_endpoint),
            log_level: lookup("LOG_LEVEL")
                .or(file.log_level)
                .unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The database URL, or a config error if none was provided.
    pub fn require_database_url(&self) -> Result<&SecretString> {
        self.database_url
            .as_ref()
            .ok_or_else(|| Error::Config("required variable DATABASE_URL is not set".to_string()))
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| Error::Config(format!("{name}={raw:?} is invalid: {e}")))
        })
        .transpose()
}
