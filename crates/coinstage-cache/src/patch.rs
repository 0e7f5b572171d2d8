//! Typed partial updates for staged orders.
//!
//! An [`OrderPatch`] names only the attributes that change. It renders into
//! a partial [`FieldMap`] using the same formatting as a full encode, so a
//! merged entry is indistinguishable from a freshly inserted one.

use chrono::{DateTime, Utc};
use coinstage_types::constants::fields;
use coinstage_types::{OrderSide, OrderStatus};
use rust_decimal::Decimal;

use crate::codec::{format_decimal, format_timestamp, FieldMap};

/// Partial order. `None` fields are left untouched by a merge.
///
/// The identifier is deliberately absent: it never changes once assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderPatch {
    pub coin_name: Option<String>,
    pub market_name: Option<String>,
    pub amount: Option<Decimal>,
    pub price: Option<Decimal>,
    pub side: Option<OrderSide>,
    pub fee: Option<Decimal>,
    pub member_idx: Option<u64>,
    pub member_uuid: Option<String>,
    pub status: Option<OrderStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn coin_name(mut self, coin: impl Into<String>) -> Self {
        self.coin_name = Some(coin.into());
        self
    }

    #[must_use]
    pub fn market_name(mut self, market: impl Into<String>) -> Self {
        self.market_name = Some(market.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn side(mut self, side: OrderSide) -> Self {
        self.side = Some(side);
        self
    }

    #[must_use]
    pub fn fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    #[must_use]
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Render only the present attributes.
    #[must_use]
    pub fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        let mut put = |name: &str, value: Option<String>| {
            if let Some(v) = value {
                map.insert(name.to_string(), v);
            }
        };
        put(fields::COIN_NAME, self.coin_name.clone());
        put(fields::MARKET_NAME, self.market_name.clone());
        put(fields::COIN_AMOUNT, self.amount.map(format_decimal));
        put(fields::ORDER_PRICE, self.price.map(format_decimal));
        put(fields::ORDER_TYPE, self.side.map(|s| s.to_string()));
        put(fields::FEE, self.fee.map(format_decimal));
        put(fields::MEMBER_IDX, self.member_idx.map(|i| i.to_string()));
        put(fields::MEMBER_UUID, self.member_uuid.clone());
        put(fields::ORDER_STATUS, self.status.map(|s| s.to_string()));
        put(fields::CREATED_AT, self.created_at.as_ref().map(format_timestamp));
        map
    }
}
