//! # coinstage-types
//!
//! Shared types, errors, and configuration for the **coinstage** order
//! staging cache.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`OrderId`], [`MarketPair`]
//! - **Order model**: [`Order`], [`OrderSide`], [`OrderStatus`]
//! - **Key naming**: [`BucketKey`], [`IndexKey`]
//! - **Configuration**: [`CacheConfig`], [`StoreConfig`]
//! - **Errors**: [`StagingError`] with `CS_ERR_` prefix codes
//! - **Constants**: field names, key segments, and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod keys;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use coinstage_types::{Order, OrderSide, BucketKey, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use keys::*;
pub use order::*;

// Constants are accessed via `coinstage_types::constants::FOO`
// (not re-exported to avoid name collisions).
