//! Configuration for the staging cache and its backing store.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{constants, Result, StagingError};

/// Top-level cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backing store connection settings.
    pub store: StoreConfig,
    /// Entries returned by a price index query when the caller gives no limit.
    pub default_range_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            default_range_limit: constants::DEFAULT_RANGE_LIMIT,
        }
    }
}

impl CacheConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| StagingError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_range_limit == 0 {
            return Err(StagingError::Configuration(
                "default_range_limit must be > 0".to_string(),
            ));
        }
        self.store.validate()
    }
}

/// Connection settings for the Redis store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Redis URL (e.g., `redis://127.0.0.1:6379/0`).
    pub redis_url: String,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read/write timeout per command in milliseconds.
    pub io_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: constants::DEFAULT_REDIS_URL.to_string(),
            connect_timeout_ms: constants::DEFAULT_CONNECT_TIMEOUT_MS,
            io_timeout_ms: constants::DEFAULT_IO_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.redis_url.starts_with("redis://")
            && !self.redis_url.starts_with("rediss://")
            && !self.redis_url.starts_with("redis+unix://")
            && !self.redis_url.starts_with("unix://")
        {
            return Err(StagingError::Configuration(format!(
                "unsupported redis url `{}`",
                self.redis_url
            )));
        }
        // Zero would disable the timeout in the redis client.
        if self.connect_timeout_ms == 0 || self.io_timeout_ms == 0 {
            return Err(StagingError::Configuration(
                "store timeouts must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
