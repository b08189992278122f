#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::InMemoryStorage;
use crate::domain::ports::DeckStorage;
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::{
    validate_host, validate_positive_number, validate_range, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageBackend {
    #[default]
    #[serde(alias = "memory")]
    InMemory,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackend::InMemory),
            "redis" => Ok(StorageBackend::Redis),
            other => Err(DeckError::InvalidConfigValueError {
                field: "storage.backend".to_string(),
                value: other.to_string(),
                reason: "Supported backends: in-memory, redis".to_string(),
            }),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::InMemory => f.write_str("in-memory"),
            StorageBackend::Redis => f.write_str("redis"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedisConfig {
    pub host: String,
    #[serde(default = "default_redis_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub response_timeout_secs: u64,
}

fn default_redis_port() -> u16 {
    DEFAULT_REDIS_PORT
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RedisConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            response_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads `REDIS_HOST` (required), `REDIS_PORT`, `REDIS_USERNAME`,
    /// `REDIS_PASSWORD` and `REDIS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let host = env::var("REDIS_HOST")
            .ok()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DeckError::MissingConfigError {
                field: "REDIS_HOST".to_string(),
            })?;

        let port = match env::var("REDIS_PORT") {
            Ok(raw) if !raw.is_empty() => parse_env("REDIS_PORT", &raw)?,
            _ => DEFAULT_REDIS_PORT,
        };

        let timeout = match env::var("REDIS_TIMEOUT_SECS") {
            Ok(raw) if !raw.is_empty() => parse_env("REDIS_TIMEOUT_SECS", &raw)?,
            _ => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            host,
            port,
            username: env::var("REDIS_USERNAME").ok().filter(|u| !u.is_empty()),
            password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
            connect_timeout_secs: timeout,
            response_timeout_secs: timeout,
        })
    }
}

fn parse_env<T: FromStr>(field: &str, raw: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    raw.parse().map_err(|e: T::Err| DeckError::InvalidConfigValueError {
        field: field.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

impl Validate for RedisConfig {
    fn validate(&self) -> Result<()> {
        validate_host("redis.host", &self.host)?;
        validate_positive_number("redis.port", u64::from(self.port), 1)?;
        validate_range("redis.connect_timeout_secs", self.connect_timeout_secs, 1, 60)?;
        validate_range("redis.response_timeout_secs", self.response_timeout_secs, 1, 60)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub redis: Option<RedisConfig>,
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn redis(redis: RedisConfig) -> Self {
        Self {
            backend: StorageBackend::Redis,
            redis: Some(redis),
        }
    }

    /// Picks the backend from `DECK_STORAGE_TYPE`, falling back to in-memory.
    pub fn from_env() -> Result<Self> {
        match env::var("DECK_STORAGE_TYPE").ok().as_deref().map(str::parse::<StorageBackend>) {
            Some(Ok(StorageBackend::Redis)) => Ok(Self::redis(RedisConfig::from_env()?)),
            Some(Ok(StorageBackend::InMemory)) => Ok(Self::in_memory()),
            Some(Err(e)) => {
                tracing::warn!("{}, using in-memory storage", e);
                Ok(Self::in_memory())
            }
            None => {
                tracing::info!("No DECK_STORAGE_TYPE set, using in-memory storage");
                Ok(Self::in_memory())
            }
        }
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Redis {
            validate_required_field("redis", &self.redis)?.validate()?;
        }
        Ok(())
    }
}

/// Builds the configured backend once, ready to be shared by every handler.
pub async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn DeckStorage>> {
    config.validate()?;

    match config.backend {
        StorageBackend::InMemory => {
            tracing::info!("Using in-memory deck storage");
            Ok(Arc::new(InMemoryStorage::new()))
        }
        #[cfg(feature = "redis")]
        StorageBackend::Redis => {
            let redis = validate_required_field("redis", &config.redis)?;
            let storage = crate::adapters::RedisStorage::connect(redis).await?;
            Ok(Arc::new(storage))
        }
        #[cfg(not(feature = "redis"))]
        StorageBackend::Redis => Err(DeckError::ConfigError {
            message: "this build has no Redis support, enable the `redis` feature".to_string(),
        }),
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
