//! In-process [`OrderStore`] backed by std collections.
//!
//! Sorted sets mirror Redis ordering: by score, then by member bytes. Each
//! set keeps a `BTreeSet<(Decimal, String)>` for range queries plus a
//! `member -> score` map so re-scoring and removal stay O(log N).

use std::collections::{BTreeSet, HashMap};

use coinstage_types::Result;
use rust_decimal::Decimal;

use crate::store::{OrderStore, ScoreOrder};

#[derive(Debug, Default)]
struct SortedSet {
    ordered: BTreeSet<(Decimal, String)>,
    scores: HashMap<String, Decimal>,
}

impl SortedSet {
    fn insert(&mut self, score: Decimal, member: &str) {
        if let Some(old) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&(old, member.to_string()));
        }
        self.ordered.insert((score, member.to_string()));
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(old) => {
                self.ordered.remove(&(old, member.to_string()));
                true
            }
            None => false,
        }
    }

    fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Volatile store for tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hashes: HashMap<String, HashMap<String, String>>,
    sorted: HashMap<String, SortedSet>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys (hashes and sorted sets).
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.hashes.len() + self.sorted.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_count() == 0
    }

    /// Score currently held by `member` in sorted set `key`.
    #[must_use]
    pub fn score(&self, key: &str, member: &str) -> Option<Decimal> {
        self.sorted.get(key)?.scores.get(member).copied()
    }
}

impl OrderStore for MemoryStore {
    fn hset(&mut self, key: &str, field: &str, value: &str) -> Result<()> {
        self.hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    fn hget(&mut self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(self.hashes.get(key).and_then(|h| h.get(field)).cloned())
    }

    fn hdel(&mut self, key: &str, field: &str) -> Result<bool> {
        let Some(hash) = self.hashes.get_mut(key) else {
            return Ok(false);
        };
        let removed = hash.remove(field).is_some();
        // Redis drops a key once its last field is gone.
        if hash.is_empty() {
            self.hashes.remove(key);
        }
        Ok(removed)
    }

    fn hlen(&mut self, key: &str) -> Result<usize> {
        Ok(self.hashes.get(key).map_or(0, HashMap::len))
    }

    fn zadd(&mut self, key: &str, score: Decimal, member: &str) -> Result<()> {
        self.sorted
            .entry(key.to_string())
            .or_default()
            .insert(score, member);
        Ok(())
    }

    fn zrem(&mut self, key: &str, member: &str) -> Result<bool> {
        let Some(set) = self.sorted.get_mut(key) else {
            return Ok(false);
        };
        let removed = set.remove(member);
        if set.is_empty() {
            self.sorted.remove(key);
        }
        Ok(removed)
    }

    fn zrange(&mut self, key: &str, order: ScoreOrder, limit: usize) -> Result<Vec<String>> {
        let Some(set) = self.sorted.get(key) else {
            return Ok(Vec::new());
        };
        let members: Vec<String> = match order {
            ScoreOrder::Ascending => set
                .ordered
                .iter()
                .take(limit)
                .map(|(_, m)| m.clone())
                .collect(),
            ScoreOrder::Descending => set
                .ordered
                .iter()
                .rev()
                .take(limit)
                .map(|(_, m)| m.clone())
                .collect(),
        };
        Ok(members)
    }
}
