//! Key naming for status buckets and price indices.
//!
//! - Bucket: `{STATUS}:ORDER:{partition}`
//! - Price index: `{STATUS}:INDEX:{partition}:{SIDE}`
//!
//! The partition is caller-supplied (commonly `COIN-MARKET`) and may itself
//! contain `:`; parsing only splits off the leading status and segment.

use std::fmt;
use std::str::FromStr;

use crate::constants::{BUCKET_SEGMENT, INDEX_SEGMENT};
use crate::{OrderSide, OrderStatus, Result, StagingError};

/// Address of one status bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub status: OrderStatus,
    pub partition: String,
}

impl BucketKey {
    /// # Errors
    /// `Validation` if the partition is blank.
    pub fn new(status: OrderStatus, partition: impl Into<String>) -> Result<Self> {
        let partition = partition.into();
        if partition.trim().is_empty() {
            return Err(StagingError::validation("partition key must not be empty"));
        }
        Ok(Self { status, partition })
    }

    /// The price index that accompanies this bucket for `side`.
    #[must_use]
    pub fn index(&self, side: OrderSide) -> IndexKey {
        IndexKey {
            status: self.status,
            partition: self.partition.clone(),
            side,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{BUCKET_SEGMENT}:{}", self.status, self.partition)
    }
}

impl FromStr for BucketKey {
    type Err = StagingError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        let (Some(status), Some(segment), Some(partition)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(StagingError::validation(format!("malformed bucket key `{s}`")));
        };
        if segment != BUCKET_SEGMENT {
            return Err(StagingError::validation(format!(
                "bucket key `{s}` must have `{BUCKET_SEGMENT}` as its second segment"
            )));
        }
        Self::new(status.parse()?, partition)
    }
}

/// Address of one price index (status, partition, side).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub status: OrderStatus,
    pub partition: String,
    pub side: OrderSide,
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{INDEX_SEGMENT}:{}:{}",
            self.status, self.partition, self.side
        )
    }
}
