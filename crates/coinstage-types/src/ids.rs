//! Identifiers used by the staging cache.
//!
//! Order identifiers are opaque strings assigned by the order-creation
//! workflow. Freshly generated ones use UUIDv7 so they sort by creation time.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Unique order identifier. Used as the hash field inside a status bucket
/// and as the member inside a price index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh time-ordered identifier (UUIDv7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// MarketPair
// ---------------------------------------------------------------------------

/// A coin quoted in a market currency (e.g., BTC in KRW).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketPair {
    pub coin: String,
    pub market: String,
}

impl MarketPair {
    #[must_use]
    pub fn new(coin: impl Into<String>, market: impl Into<String>) -> Self {
        Self {
            coin: coin.into(),
            market: market.into(),
        }
    }

    /// Default partition key for this pair's buckets, e.g. `BTC-KRW`.
    #[must_use]
    pub fn partition_key(&self) -> String {
        format!("{}-{}", self.coin, self.market)
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.coin, self.market)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
