//! Unique identifier types for engine entities
//!
//! Ids are monotonically increasing positive integers, minted by counters
//! owned by the engine. An id is never reused over the lifetime of the
//! engine, which makes both kinds usable as stable keys in logs and in
//! the durable CSV files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an order
///
/// Assigned at submission from the engine's `next_order_id` counter.
/// After a restart the counter resumes past the highest id restored from
/// the active-order snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    /// Create from a raw counter value
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Get the inner value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade
///
/// Minted by the match executor in strike order; strictly increasing
/// within a run and, because the trade journal is scanned at startup,
/// across runs as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(u64);

impl TradeId {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
