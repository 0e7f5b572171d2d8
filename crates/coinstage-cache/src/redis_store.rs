//! Redis-backed [`OrderStore`] over a synchronous connection.
//!
//! Buckets are Redis hashes (`HSET`/`HGET`/`HDEL`/`HLEN`) and price indices
//! are sorted sets (`ZADD`/`ZREM`/`ZRANGE`/`ZREVRANGE`). Scores travel as
//! `f64`; the exact decimal price always lives in the bucket entry.

use coinstage_types::{Result, StagingError, StoreConfig, constants};
use redis::{Commands, ErrorKind, RedisError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::store::{OrderStore, ScoreOrder};

/// Synchronous Redis store. One connection, used by one owner at a time.
pub struct RedisStore {
    conn: redis::Connection,
}

impl RedisStore {
    /// Open a connection with the configured connect and I/O timeouts.
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let client = redis::Client::open(config.redis_url.as_str())
            .map_err(|e| StagingError::Configuration(e.to_string()))?;
        let conn = client
            .get_connection_with_timeout(config.connect_timeout())
            .map_err(store_error)?;
        conn.set_read_timeout(Some(config.io_timeout()))
            .map_err(store_error)?;
        conn.set_write_timeout(Some(config.io_timeout()))
            .map_err(store_error)?;
        tracing::info!(
            version = constants::VERSION,
            connect_timeout_ms = config.connect_timeout_ms,
            io_timeout_ms = config.io_timeout_ms,
            "connected to redis order store"
        );
        Ok(Self { conn })
    }

    /// Wrap an already-open connection.
    #[must_use]
    pub fn from_connection(conn: redis::Connection) -> Self {
        Self { conn }
    }
}

fn store_error(err: RedisError) -> StagingError {
    // WRONGTYPE and reply-shape errors mean the key holds something we did
    // not write; everything else is transport.
    if matches!(err.kind(), ErrorKind::TypeError) || err.code() == Some("WRONGTYPE") {
        return StagingError::serialization(err.to_string());
    }
    StagingError::StoreUnavailable {
        reason: err.to_string(),
    }
}

fn score_of(price: Decimal) -> Result<f64> {
    price
        .to_f64()
        .ok_or_else(|| StagingError::validation(format!("price {price} has no f64 score")))
}

impl OrderStore for RedisStore {
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        let _: () = self.conn.hset(key, field, value).map_err(store_error)?;
        Ok(())
    }

    fn hget(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        self.conn.hget(key, field).map_err(store_error)
    }

    fn hdel(&mut self, key: &str, field: &str) -> Result<bool> {
        let removed: i64 = self.conn.hdel(key, field).map_err(store_error)?;
        Ok(removed > 0)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        self.conn.hlen(key).map_err(store_error)
    }

    fn zadd(&mut self, key: &str, score: Decimal, member: &str) -> Result<()> {
        let score = score_of(score)?;
        let _: () = self.conn.zadd(key, member, score).map_err(store_error)?;
        Ok(())
    }

    fn zrem(&mut self, key: &str, member: &str) -> Result<bool> {
        let removed: i64 = self.conn.zrem(key, member).map_err(store_error)?;
        Ok(removed > 0)
    }

    fn zrange(&mut self, key: &str, order: ScoreOrder, limit: usize) -> Result<Vec<String>> {
        // ZRANGE treats stop = -1 as "to the end", so zero must short-circuit.
        if limit == 0 {
            return Ok(Vec::new());
        }
        let stop = isize::try_from(limit - 1).unwrap_or(isize::MAX);
        let members: redis::RedisResult<Vec<String>> = match order {
            ScoreOrder::Ascending => self.conn.zrange(key, 0, stop),
            ScoreOrder::Descending => self.conn.zrevrange(key, 0, stop),
        };
        members.map_err(store_error)
    }
}
