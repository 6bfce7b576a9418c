//! Purchase audit trail.
//!
//! Every completed marketplace purchase appends a [`PurchaseRecord`].
//! The TradeLedger is the history of peer-to-peer trades; this log is
//! the history of marketplace sales.
//!
//! The log is bounded so memory usage stays predictable in long-running
//! processes: when the capacity is reached, the oldest record is
//! evicted to make room.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradepost_types::{ItemId, UserId};

/// The record of one completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// The item that changed hands.
    pub item: ItemId,
    /// The previous owner.
    pub seller: UserId,
    /// The new owner.
    pub buyer: UserId,
    /// The listed price the item sold at.
    pub price: Decimal,
    /// When the purchase was executed.
    pub executed_at: DateTime<Utc>,
}

impl std::fmt::Display for PurchaseRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Purchase[{}] {} -> {} @ {}",
            self.item, self.seller, self.buyer, self.price,
        )
    }
}

/// Bounded append-only log of completed purchases.
pub struct PurchaseLog {
    /// Records in execution order (front = oldest).
    records: VecDeque<PurchaseRecord>,
    /// Maximum number of records before eviction kicks in.
    capacity: usize,
}

impl PurchaseLog {
    /// Create a new log with the given capacity.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "PurchaseLog capacity must be > 0");
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append a purchase record, evicting the oldest if at capacity.
    pub fn append(&mut self, record: PurchaseRecord) {
        if self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Purchases made by a user, most recent first.
    #[must_use]
    pub fn purchases_for(&self, user: UserId) -> Vec<&PurchaseRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| r.buyer == user)
            .collect()
    }

    /// Sales made by a user, most recent first.
    #[must_use]
    pub fn sales_for(&self, user: UserId) -> Vec<&PurchaseRecord> {
        self.records
            .iter()
            .rev()
            .filter(|r| r.seller == user)
            .collect()
    }

    /// Number of records currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
