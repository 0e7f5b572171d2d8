//! # coinstage-cache
//!
//! **Order staging cache**: stages orders in a key-value store before they
//! are persisted or matched.
//!
//! ## Architecture
//!
//! 1. **codec**: typed [`Order`](coinstage_types::Order) ⇄ string field mapping
//! 2. **OrderStore**: the hash + sorted-set operations the cache needs
//! 3. **MemoryStore** / **RedisStore**: in-process and Redis backends
//! 4. **OrderStagingCache**: status buckets plus per-side price indices
//!
//! ## Order Flow
//!
//! ```text
//! create → OrderStagingCache.insert() → HSET {STATUS}:ORDER:{partition}
//!                                    → ZADD {STATUS}:INDEX:{partition}:{SIDE}
//! update → OrderStagingCache.update_field() → HGET + merge + HSET
//! match  → OrderStagingCache.best_orders() → ZRANGE / ZREVRANGE
//! ```
//!
//! Matching and settlement are not part of this crate.

pub mod codec;
pub mod memory_store;
pub mod patch;
pub mod redis_store;
pub mod staging;
pub mod store;

pub use codec::FieldMap;
pub use memory_store::MemoryStore;
pub use patch::OrderPatch;
pub use redis_store::RedisStore;
pub use staging::OrderStagingCache;
pub use store::{OrderStore, ScoreOrder};
