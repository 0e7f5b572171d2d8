//! Order model staged by the cache.
//!
//! The cache never interprets an order beyond validation and price-index
//! placement; matching and settlement happen elsewhere.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{MarketPair, OrderId, Result, StagingError};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const ALL: [Self; 2] = [Self::Buy, Self::Sell];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = StagingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(StagingError::Validation {
                reason: format!("unknown order side `{other}`"),
            }),
        }
    }
}

/// Lifecycle status of an order.
///
/// `Pending -> {Filled, Cancelled, PartiallyFilled -> Pending}`. The cache
/// stores whatever status it is given; transition legality is the caller's
/// concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::PartiallyFilled => "PARTIALLY_FILLED",
            Self::Filled => "FILLED",
            Self::Cancelled => "CANCELLED",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StagingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "PARTIALLY_FILLED" => Ok(Self::PartiallyFilled),
            "FILLED" => Ok(Self::Filled),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(StagingError::Validation {
                reason: format!("unknown order status `{other}`"),
            }),
        }
    }
}

/// A coin order as staged in a status bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub coin_name: String,
    pub market_name: String,
    pub amount: Decimal,
    pub price: Decimal,
    pub side: OrderSide,
    pub fee: Decimal,
    /// Numeric owner identifier.
    pub member_idx: u64,
    /// Owner reference (external member uuid).
    pub member_uuid: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn market(&self) -> MarketPair {
        MarketPair::new(self.coin_name.clone(), self.market_name.clone())
    }

    /// Check the invariants every staged order must hold.
    ///
    /// # Errors
    /// `Validation` if the identifier is blank or amount/price is negative.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(StagingError::Validation {
                reason: "order identifier must not be empty".to_string(),
            });
        }
        if self.amount < Decimal::ZERO {
            return Err(StagingError::Validation {
                reason: format!("amount must be non-negative, got {}", self.amount),
            });
        }
        if self.price < Decimal::ZERO {
            return Err(StagingError::Validation {
                reason: format!("price must be non-negative, got {}", self.price),
            });
        }
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Order {
    pub fn dummy(side: OrderSide, price: Decimal, amount: Decimal) -> Self {
        Self::dummy_with_id(OrderId::generate(), side, price, amount)
    }

    pub fn dummy_with_id(
        id: impl Into<OrderId>,
        side: OrderSide,
        price: Decimal,
        amount: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            coin_name: "BTC".to_string(),
            market_name: "KRW".to_string(),
            amount,
            price,
            side,
            fee: Decimal::new(1, 3),
            member_idx: 123,
            member_uuid: "memberUuid123".to_string(),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
