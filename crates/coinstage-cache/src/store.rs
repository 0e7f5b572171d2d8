//! Key-value store abstraction consumed by the staging cache.
//!
//! Two structure families are needed: hashes (bucket → field → value) and
//! sorted sets (index → member scored by price). Each single call is assumed
//! atomic on the store side; nothing here spans two calls.

use coinstage_types::{OrderSide, Result};
use rust_decimal::Decimal;

/// Direction of a sorted-set range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrder {
    /// Lowest score first; ties by member ascending.
    Ascending,
    /// Highest score first; ties by member descending.
    Descending,
}

impl ScoreOrder {
    /// Best-price-first order for a book side: bids descend, asks ascend.
    #[must_use]
    pub fn for_side(side: OrderSide) -> Self {
        match side {
            OrderSide::Buy => Self::Descending,
            OrderSide::Sell => Self::Ascending,
        }
    }
}

/// Hash and sorted-set operations the cache needs from its backing store.
///
/// Implementations report transport failures as `StoreUnavailable` and never
/// retry.
pub trait OrderStore {
    /// Set `field` of hash `key` to `value`, creating the hash if needed.
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()>;

    fn hget(&mut self, key: &str, field: &str) -> Result<Option<String>>;

    /// Returns `true` if the field existed.
    fn hdel(&mut self, key: &str, field: &str) -> Result<bool>;

    fn hlen(&mut self, key: &str) -> Result<usize>;

    /// Add `member` with `score`, replacing its previous score if present.
    fn zadd(&mut self, key: &str, score: Decimal, member: &str) -> Result<()>;

    /// Returns `true` if the member existed.
    fn zrem(&mut self, key: &str, member: &str) -> Result<bool>;

    /// Up to `limit` members in `order`. A `limit` of zero yields nothing.
    fn zrange(&mut self, key: &str, order: ScoreOrder, limit: usize) -> Result<Vec<String>>;
}

impl<S: OrderStore + ?Sized> OrderStore for &mut S {
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        (**self).hset(key, field, value)
    }

    fn hget(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        (**self).hget(key, field)
    }

    fn hdel(&mut self, key: &str, field: &str) -> Result<bool> {
        (**self).hdel(key, field)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        (**self).hlen(key)
    }

    fn zadd(&mut self, key: &str, score: Decimal, member: &str) -> Result<()> {
        (**self).zadd(key, score, member)
    }

    fn zrem(&mut self, key: &str, member: &str) -> Result<bool> {
        (**self).zrem(key, member)
    }

    fn zrange(&mut self, key: &str, order: ScoreOrder, limit: usize) -> Result<Vec<String>> {
        (**self).zrange(key, order, limit)
    }
}

impl<S: OrderStore + ?Sized> OrderStore for Box<S> {
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        (**self).hset(key, field, value)
    }

    fn hget(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        (**self).hget(key, field)
    }

    fn hdel(&mut self, key: &str, field: &str) -> Result<bool> {
        (**self).hdel(key, field)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        (**self).hlen(key)
    }

    fn zadd(&mut self, key: &str, score: Decimal, member: &str) -> Result<()> {
        (**self).zadd(key, score, member)
    }

    fn zrem(&mut self, key: &str, member: &str) -> Result<bool> {
        (**self).zrem(key, member)
    }

    fn zrange(&mut self, key: &str, order: ScoreOrder, limit: usize) -> Result<Vec<String>> {
        (**self).zrange(key, order, limit)
    }
}
