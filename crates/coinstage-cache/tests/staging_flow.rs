//! Integration tests: the staging cache over a real store implementation.
//!
//! Covers the create → update → read → move flow, price-index ordering
//! under randomized prices, and how store failures surface to callers.

use coinstage_cache::{
    FieldMap, MemoryStore, OrderPatch, OrderStagingCache, OrderStore, ScoreOrder, codec,
};
use coinstage_types::*;
use rand::Rng;
use rust_decimal::Decimal;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Store wrapper that counts writes and can be told to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    writes: usize,
    fail_hash_writes: bool,
    fail_index_writes: bool,
    fail_reads: bool,
}

fn unavailable() -> StagingError {
    StagingError::StoreUnavailable {
        reason: "connection refused".to_string(),
    }
}

impl OrderStore for FlakyStore {
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        if self.fail_hash_writes {
            return Err(unavailable());
        }
        self.writes += 1;
        self.inner.hset(key, field, value)
    }

    fn hget(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        self.inner.hget(key, field)
    }

    fn hdel(&mut self, key: &str, field: &str) -> Result<bool> {
        self.writes += 1;
        self.inner.hdel(key, field)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        self.inner.hlen(key)
    }

    fn zadd(&mut self, key: &str, score: Decimal, member: &str) -> Result<()> {
        if self.fail_index_writes {
            return Err(unavailable());
        }
        self.writes += 1;
        self.inner.zadd(key, score, member)
    }

    fn zrem(&mut self, key: &str, member: &str) -> Result<bool> {
        self.writes += 1;
        self.inner.zrem(key, member)
    }

    fn zrange(&mut self, key: &str, order: ScoreOrder, limit: usize) -> Result<Vec<String>> {
        if self.fail_reads {
            return Err(unavailable());
        }
        self.inner.zrange(key, order, limit)
    }
}

#[test]
fn insert_update_read_example() {
    init_tracing();
    let mut cache = OrderStagingCache::new(MemoryStore::new());

    let order = Order {
        id: OrderId::new("testUuid"),
        coin_name: "BTC".into(),
        market_name: "KRW".into(),
        amount: Decimal::new(1, 1),
        price: dec(50000),
        side: OrderSide::Buy,
        fee: Decimal::new(1, 3),
        member_idx: 123,
        member_uuid: "memberUuid123".into(),
        status: OrderStatus::Pending,
        created_at: chrono::Utc::now(),
    };
    cache.insert("testKey", OrderStatus::Pending, &order).unwrap();

    let map = cache.get_field("PENDING:ORDER:testKey", "testUuid").unwrap();
    assert_eq!(map["orderType"], "BUY");
    assert_eq!(map["marketName"], "KRW");
    assert_eq!(map["coinAmount"], "0.1");
    assert_eq!(map, codec::encode_order(&order));

    cache
        .apply_patch(
            "PENDING:ORDER:testKey",
            "testUuid",
            &OrderPatch::new().coin_name("ETH").market_name("USDT"),
        )
        .unwrap();
    let updated = cache.get_order("PENDING:ORDER:testKey", "testUuid").unwrap();
    assert_eq!(updated.coin_name, "ETH");
    assert_eq!(updated.market_name, "USDT");
    assert_eq!(updated.amount, order.amount);
    assert_eq!(updated.price, order.price);
    assert_eq!(updated.created_at, order.created_at);
}

#[test]
fn randomized_prices_come_back_best_first() {
    init_tracing();
    let mut rng = rand::thread_rng();
    let mut cache = OrderStagingCache::new(MemoryStore::new());
    let partition = MarketPair::new("BTC", "KRW").partition_key();

    for i in 0..500 {
        let side = if i % 2 == 0 { OrderSide::Buy } else { OrderSide::Sell };
        let price = dec(5000 + rng.gen_range(0..=1000));
        let order = Order::dummy_with_id(format!("orderUuid-{i}"), side, price, Decimal::new(1, 1));
        cache.insert(&partition, OrderStatus::Pending, &order).unwrap();
    }

    let bucket = BucketKey::new(OrderStatus::Pending, partition.clone())
        .unwrap()
        .to_string();
    assert_eq!(cache.bucket_len(&bucket).unwrap(), 500);

    let bids = cache
        .peek_best(&partition, OrderStatus::Pending, OrderSide::Buy, Some(250))
        .unwrap();
    assert_eq!(bids.len(), 250);
    assert!(bids.windows(2).all(|w| w[0].price >= w[1].price));
    assert!(bids.iter().all(|o| o.side == OrderSide::Buy));

    let asks = cache
        .peek_best(&partition, OrderStatus::Pending, OrderSide::Sell, Some(250))
        .unwrap();
    assert_eq!(asks.len(), 250);
    assert!(asks.windows(2).all(|w| w[0].price <= w[1].price));
}

#[test]
fn default_limit_comes_from_config() {
    let config = CacheConfig {
        default_range_limit: 3,
        ..CacheConfig::default()
    };
    let mut cache = OrderStagingCache::with_config(MemoryStore::new(), config);
    for i in 0..10 {
        let order = Order::dummy_with_id(format!("s{i}"), OrderSide::Sell, dec(100 + i), Decimal::ONE);
        cache.insert("p", OrderStatus::Pending, &order).unwrap();
    }
    let ids = cache
        .best_orders("p", OrderStatus::Pending, OrderSide::Sell, None)
        .unwrap();
    assert_eq!(ids, vec![OrderId::from("s0"), "s1".into(), "s2".into()]);
}

#[test]
fn invalid_insert_performs_no_writes() {
    let mut cache = OrderStagingCache::new(FlakyStore::default());

    let blank = Order::dummy_with_id("", OrderSide::Buy, dec(1), Decimal::ONE);
    let err = cache.insert("p", OrderStatus::Pending, &blank).unwrap_err();
    assert!(matches!(err, StagingError::Validation { .. }));

    let mut negative = Order::dummy(OrderSide::Sell, dec(1), Decimal::ONE);
    negative.amount = dec(-5);
    let err = cache.insert("p", OrderStatus::Pending, &negative).unwrap_err();
    assert!(matches!(err, StagingError::Validation { .. }));

    assert_eq!(cache.store().writes, 0);
    assert!(cache.store().inner.is_empty());
}

#[test]
fn unreachable_store_surfaces_without_retry() {
    let store = FlakyStore {
        fail_hash_writes: true,
        ..FlakyStore::default()
    };
    let mut cache = OrderStagingCache::new(store);
    let order = Order::dummy(OrderSide::Buy, dec(100), Decimal::ONE);
    let err = cache.insert("p", OrderStatus::Pending, &order).unwrap_err();
    assert!(matches!(err, StagingError::StoreUnavailable { .. }));
    assert!(err.is_transient());
    // The index write is never attempted after the bucket write fails.
    assert_eq!(cache.store().writes, 0);
    assert!(cache.store().inner.is_empty());
}

#[test]
fn failed_index_write_leaves_bucket_entry() {
    init_tracing();
    let store = FlakyStore {
        fail_index_writes: true,
        ..FlakyStore::default()
    };
    let mut cache = OrderStagingCache::new(store);
    let order = Order::dummy_with_id("half", OrderSide::Sell, dec(100), Decimal::ONE);

    let err = cache.insert("p", OrderStatus::Pending, &order).unwrap_err();
    assert!(matches!(err, StagingError::StoreUnavailable { .. }));

    cache.store_mut().fail_index_writes = false;
    assert_eq!(cache.get_order("PENDING:ORDER:p", "half").unwrap(), order);
    assert!(cache
        .best_orders("p", OrderStatus::Pending, OrderSide::Sell, None)
        .unwrap()
        .is_empty());

    // Re-inserting heals the index.
    cache.insert("p", OrderStatus::Pending, &order).unwrap();
    assert_eq!(
        cache
            .best_orders("p", OrderStatus::Pending, OrderSide::Sell, None)
            .unwrap(),
        vec![OrderId::from("half")]
    );
}

#[test]
fn read_failures_are_store_unavailable() {
    let store = FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    };
    let mut cache = OrderStagingCache::new(store);
    assert!(matches!(
        cache.get_field("PENDING:ORDER:p", "x").unwrap_err(),
        StagingError::StoreUnavailable { .. }
    ));
    assert!(matches!(
        cache
            .best_orders("p", OrderStatus::Pending, OrderSide::Buy, None)
            .unwrap_err(),
        StagingError::StoreUnavailable { .. }
    ));
    let partial: FieldMap = [("fee".to_string(), "0".to_string())].into();
    assert!(matches!(
        cache.update_field("PENDING:ORDER:p", "x", &partial).unwrap_err(),
        StagingError::StoreUnavailable { .. }
    ));
}

#[test]
fn partial_fill_loop_and_cancel() {
    init_tracing();
    let mut cache = OrderStagingCache::new(MemoryStore::new());
    let order = Order::dummy_with_id("loop", OrderSide::Buy, dec(200), dec(10));
    cache.insert("BTC-KRW", OrderStatus::Pending, &order).unwrap();

    // Partially filled: amount shrinks, status recorded, back to pending.
    let moved = cache
        .move_status("BTC-KRW", OrderStatus::Pending, OrderStatus::PartiallyFilled, "loop")
        .unwrap();
    assert_eq!(moved.status, OrderStatus::PartiallyFilled);
    cache
        .apply_patch(
            "PARTIALLY_FILLED:ORDER:BTC-KRW",
            "loop",
            &OrderPatch::new().amount(dec(4)),
        )
        .unwrap();
    cache
        .move_status("BTC-KRW", OrderStatus::PartiallyFilled, OrderStatus::Pending, "loop")
        .unwrap();

    let back = cache.get_order("PENDING:ORDER:BTC-KRW", "loop").unwrap();
    assert_eq!(back.amount, dec(4));
    assert_eq!(back.status, OrderStatus::Pending);

    let cancelled = cache
        .move_status("BTC-KRW", OrderStatus::Pending, OrderStatus::Cancelled, "loop")
        .unwrap();
    assert!(cancelled.status.is_terminal());
    assert_eq!(cache.bucket_len("PENDING:ORDER:BTC-KRW").unwrap(), 0);
    assert_eq!(cache.bucket_len("PARTIALLY_FILLED:ORDER:BTC-KRW").unwrap(), 0);
    assert_eq!(cache.bucket_len("CANCELLED:ORDER:BTC-KRW").unwrap(), 1);
}
