//! The order staging cache.
//!
//! Orders are staged per status and partition before a downstream process
//! persists or matches them. Each order lives in two places:
//!
//! - its status bucket `{STATUS}:ORDER:{partition}`, field = order id,
//!   value = serialized field mapping;
//! - the price index `{STATUS}:INDEX:{partition}:{SIDE}`, member = order id,
//!   score = price. Bids are read highest first, asks lowest first.
//!
//! The two writes of an insert are independent store calls. If the second
//! one fails the bucket entry stays and the index is stale until the next
//! successful write for that order. The failure is logged and returned; it
//! is not rolled back.

use coinstage_types::constants::fields;
use coinstage_types::{
    BucketKey, CacheConfig, Order, OrderId, OrderSide, OrderStatus, Result, StagingError,
};

use crate::codec::{self, FieldMap};
use crate::patch::OrderPatch;
use crate::store::{OrderStore, ScoreOrder};

/// Stages orders in a key-value store under status buckets with
/// price-ordered indices.
///
/// The cache does not enforce status transitions; it reflects whatever is
/// written.
pub struct OrderStagingCache<S> {
    store: S,
    config: CacheConfig,
}

impl<S: OrderStore> OrderStagingCache<S> {
    /// Create a cache over `store` with the default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_config(store, CacheConfig::default())
    }

    /// Create a cache over `store` with an explicit configuration.
    #[must_use]
    pub fn with_config(store: S, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Read-only access to the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store. Writes made here bypass
    /// validation and index maintenance.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume the cache and return its store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.store
    }

    // =================================================================
    // Writes
    // =================================================================

    /// Stage `order` in the `status` bucket of `partition` and index it by
    /// price on its side.
    ///
    /// # Errors
    /// - `Validation` for a blank partition, blank identifier, or negative
    ///   amount/price. Nothing is written.
    /// - `StoreUnavailable` from either write. If the index write fails the
    ///   bucket entry is already in place.
    pub fn insert(&mut self, partition: &str, status: OrderStatus, order: &Order) -> Result<()> {
        let bucket = BucketKey::new(status, partition)?;
        order.validate()?;

        let value = codec::to_value(&codec::encode_order(order))?;
        let bucket_name = bucket.to_string();
        self.store.hset(&bucket_name, order.id.as_str(), &value)?;

        let index_name = bucket.index(order.side).to_string();
        if let Err(err) = self.index(&bucket, order) {
            tracing::warn!(
                bucket = %bucket_name,
                index = %index_name,
                order_id = %order.id,
                error = %err,
                "bucket entry written but price index write failed"
            );
            return Err(err);
        }

        tracing::debug!(
            bucket = %bucket_name,
            order_id = %order.id,
            side = %order.side,
            price = %order.price,
            "order staged"
        );
        Ok(())
    }

    /// Merge `partial` into the stored entry for `id`, overwriting only the
    /// fields it names.
    ///
    /// The merged entry is stored in canonical form, so decimals and
    /// timestamps from `partial` are re-rendered. If `partial` changes
    /// `orderPrice` or `orderType` the price index entry moves with it.
    ///
    /// # Errors
    /// - `Validation` if the bucket key is malformed, `partial` names an
    ///   unknown attribute, tries to change `uuid`, or the merged order
    ///   would be invalid. Nothing is written.
    /// - `NotFound` if the bucket has no entry for `id`.
    /// - `Serialization` if the stored entry is corrupt.
    pub fn update_field(&mut self, bucket_key: &str, id: &str, partial: &FieldMap) -> Result<()> {
        let bucket: BucketKey = bucket_key.parse()?;
        check_id(id)?;
        check_partial(id, partial)?;

        let mut merged_fields = self.load(bucket_key, id)?;
        codec::decode_order(&merged_fields)?;
        merged_fields.extend(partial.iter().map(|(k, v)| (k.clone(), v.clone())));
        let merged = codec::decode_order(&merged_fields).map_err(|e| {
            StagingError::validation(format!("partial update for {id} does not decode: {e}"))
        })?;
        merged.validate()?;

        self.store
            .hset(bucket_key, id, &codec::to_value(&codec::encode_order(&merged))?)?;

        let reindex =
            partial.contains_key(fields::ORDER_PRICE) || partial.contains_key(fields::ORDER_TYPE);
        if reindex {
            self.index(&bucket, &merged)?;
        }

        tracing::debug!(
            bucket = %bucket_key,
            order_id = %id,
            fields = partial.len(),
            reindexed = reindex,
            "order entry updated"
        );
        Ok(())
    }

    /// [`update_field`](Self::update_field) with a typed patch.
    pub fn apply_patch(&mut self, bucket_key: &str, id: &str, patch: &OrderPatch) -> Result<()> {
        self.update_field(bucket_key, id, &patch.to_fields())
    }

    /// Delete the entry for `id` and its price index membership.
    ///
    /// # Errors
    /// `NotFound` if absent; `Serialization` if the stored entry is corrupt
    /// (nothing is deleted in that case).
    pub fn remove(&mut self, bucket_key: &str, id: &str) -> Result<Order> {
        let bucket: BucketKey = bucket_key.parse()?;
        check_id(id)?;
        let order = codec::decode_order(&self.load(bucket_key, id)?)?;

        self.store.hdel(bucket_key, id)?;
        // A stale entry may exist on the other side after a crash mid-update.
        for side in OrderSide::ALL {
            self.store.zrem(&bucket.index(side).to_string(), id)?;
        }

        tracing::debug!(bucket = %bucket_key, order_id = %id, "order unstaged");
        Ok(order)
    }

    /// Move an order from its `from` bucket to the `to` bucket of the same
    /// partition, rewriting its status field.
    ///
    /// The target is written before the source is removed, so a failure in
    /// between leaves the order staged twice rather than not at all.
    pub fn move_status(
        &mut self,
        partition: &str,
        from: OrderStatus,
        to: OrderStatus,
        id: &str,
    ) -> Result<Order> {
        let source = BucketKey::new(from, partition)?.to_string();
        check_id(id)?;
        let mut order = codec::decode_order(&self.load(&source, id)?)?;
        if from == to {
            return Ok(order);
        }
        order.status = to;
        self.insert(partition, to, &order)?;
        self.remove(&source, id)?;

        tracing::debug!(partition, order_id = %id, %from, %to, "order status moved");
        Ok(order)
    }

    // =================================================================
    // Reads
    // =================================================================

    /// Full serialized field mapping for `id`.
    ///
    /// # Errors
    /// `NotFound` if absent; `Serialization` if the stored value is not a
    /// field mapping.
    pub fn get_field(&mut self, bucket_key: &str, id: &str) -> Result<FieldMap> {
        bucket_key.parse::<BucketKey>()?;
        check_id(id)?;
        self.load(bucket_key, id)
    }

    /// Typed view of the entry for `id`.
    pub fn get_order(&mut self, bucket_key: &str, id: &str) -> Result<Order> {
        codec::decode_order(&self.get_field(bucket_key, id)?)
    }

    /// Number of orders staged in a bucket.
    pub fn bucket_len(&mut self, bucket_key: &str) -> Result<usize> {
        bucket_key.parse::<BucketKey>()?;
        self.store.hlen(bucket_key)
    }

    /// Identifiers of the best-priced orders on `side`: highest price first
    /// for BUY, lowest first for SELL. `limit` falls back to
    /// `config.default_range_limit`.
    pub fn best_orders(
        &mut self,
        partition: &str,
        status: OrderStatus,
        side: OrderSide,
        limit: Option<usize>,
    ) -> Result<Vec<OrderId>> {
        let bucket = BucketKey::new(status, partition)?;
        let limit = limit.unwrap_or(self.config.default_range_limit);
        let members = self.store.zrange(
            &bucket.index(side).to_string(),
            ScoreOrder::for_side(side),
            limit,
        )?;
        Ok(members.into_iter().map(OrderId::from).collect())
    }

    /// Best-priced orders on `side`, decoded from their bucket.
    ///
    /// Index members whose bucket entry is gone are skipped.
    pub fn peek_best(
        &mut self,
        partition: &str,
        status: OrderStatus,
        side: OrderSide,
        limit: Option<usize>,
    ) -> Result<Vec<Order>> {
        let bucket_name = BucketKey::new(status, partition)?.to_string();
        let ids = self.best_orders(partition, status, side, limit)?;
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.hget(&bucket_name, id.as_str())? {
                Some(raw) => orders.push(codec::decode_order(&codec::from_value(&raw)?)?),
                None => tracing::warn!(
                    bucket = %bucket_name,
                    order_id = %id,
                    "price index references a missing bucket entry"
                ),
            }
        }
        Ok(orders)
    }

    /// Put `order` in its side's index and take it out of the other one.
    fn index(&mut self, bucket: &BucketKey, order: &Order) -> Result<()> {
        let id = order.id.as_str();
        for side in OrderSide::ALL {
            if side != order.side {
                self.store.zrem(&bucket.index(side).to_string(), id)?;
            }
        }
        self.store
            .zadd(&bucket.index(order.side).to_string(), order.price, id)
    }

    fn load(&mut self, bucket_key: &str, id: &str) -> Result<FieldMap> {
        let raw = self
            .store
            .hget(bucket_key, id)?
            .ok_or_else(|| StagingError::not_found(bucket_key, id))?;
        codec::from_value(&raw)
    }
}

fn check_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(StagingError::validation("order identifier must not be empty"));
    }
    Ok(())
}

fn check_partial(id: &str, partial: &FieldMap) -> Result<()> {
    if let Some(unknown) = partial.keys().find(|k| !fields::is_known(k)) {
        return Err(StagingError::validation(format!(
            "unknown order attribute `{unknown}`"
        )));
    }
    if let Some(new_id) = partial.get(fields::UUID) {
        if new_id != id {
            return Err(StagingError::validation(format!(
                "order identifier is immutable: {id} -> {new_id}"
            )));
        }
    }
    Ok(())
}
