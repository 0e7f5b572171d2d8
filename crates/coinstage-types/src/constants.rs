//! System-wide constants for the staging cache.

/// Key segment separating status from partition in a bucket key.
pub const BUCKET_SEGMENT: &str = "ORDER";

/// Key segment separating status from partition in a price index key.
pub const INDEX_SEGMENT: &str = "INDEX";

/// Render format for timestamps in stored field mappings (UTC, no offset).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";

/// Parse format for stored timestamps. Accepts any fractional precision.
pub const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Default Redis endpoint.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default connect timeout for the Redis store in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2000;

/// Default read/write timeout for the Redis store in milliseconds.
pub const DEFAULT_IO_TIMEOUT_MS: u64 = 1000;

/// Default number of entries returned by a price index range query.
pub const DEFAULT_RANGE_LIMIT: usize = 100;

/// Field names of the serialized order mapping.
pub mod fields {
    pub const UUID: &str = "uuid";
    pub const COIN_NAME: &str = "coinName";
    pub const MARKET_NAME: &str = "marketName";
    pub const COIN_AMOUNT: &str = "coinAmount";
    pub const ORDER_PRICE: &str = "orderPrice";
    pub const ORDER_TYPE: &str = "orderType";
    pub const FEE: &str = "fee";
    pub const MEMBER_IDX: &str = "memberIdx";
    pub const MEMBER_UUID: &str = "memberUuid";
    pub const ORDER_STATUS: &str = "orderStatus";
    pub const CREATED_AT: &str = "createdAt";

    pub const ALL: [&str; 11] = [
        UUID,
        COIN_NAME,
        MARKET_NAME,
        COIN_AMOUNT,
        ORDER_PRICE,
        ORDER_TYPE,
        FEE,
        MEMBER_IDX,
        MEMBER_UUID,
        ORDER_STATUS,
        CREATED_AT,
    ];

    #[must_use]
    pub fn is_known(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
