//! Error types for the TradePost engine.
//!
//! All errors use the `TP_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Ownership errors
//! - 2xx: Listing errors
//! - 3xx: Trade / escrow errors
//! - 4xx: Purchase errors
//! - 8xx: Invariant errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ItemId, TradeId, TradeStatus, UserId};

/// Central error enum for all TradePost operations.
#[derive(Debug, Error)]
pub enum TradepostError {
    // =================================================================
    // Ownership Errors (1xx)
    // =================================================================
    /// The item has no ownership record.
    #[error("TP_ERR_100: Item not found: {0}")]
    ItemNotFound(ItemId),

    /// The optimistic transfer guard failed: the item is no longer held
    /// by the owner the caller expected. Someone else moved it first.
    #[error("TP_ERR_101: Ownership mismatch for {item}: expected owner {expected}")]
    OwnershipMismatch { item: ItemId, expected: UserId },

    /// An ownership record for this item already exists.
    #[error("TP_ERR_102: Item already admitted: {0}")]
    DuplicateItem(ItemId),

    // =================================================================
    // Listing Errors (2xx)
    // =================================================================
    /// The item is not currently listed on the marketplace.
    #[error("TP_ERR_200: Item not listed: {0}")]
    NotListed(ItemId),

    /// A listing price must be non-negative.
    #[error("TP_ERR_201: Invalid listing price: {price}")]
    InvalidPrice { price: Decimal },

    /// The item is referenced by a pending trade and cannot be listed.
    #[error("TP_ERR_202: Item {item} is held by pending trade {trade}")]
    ListingBlocked { item: ItemId, trade: TradeId },

    // =================================================================
    // Trade / Escrow Errors (3xx)
    // =================================================================
    /// The referenced trade does not exist.
    #[error("TP_ERR_300: Trade not found: {0}")]
    TradeNotFound(TradeId),

    /// The trade proposal failed validation.
    #[error("TP_ERR_301: Invalid trade: {reason}")]
    InvalidTrade { reason: String },

    /// The trade is in a terminal state and admits no further mutation.
    #[error("TP_ERR_302: Trade {trade} is {status}, not PENDING")]
    TradeNotPending { trade: TradeId, status: TradeStatus },

    /// The acting user is neither the source nor the destination of the trade.
    #[error("TP_ERR_303: User {user} is not a participant of trade {trade}")]
    Unauthorized { user: UserId, trade: TradeId },

    /// Completion aborted: an involved item was sold or traded away since
    /// proposal. The trade remains PENDING; no partial transfer occurred.
    #[error("TP_ERR_304: Trade {trade} conflict: item {item} changed owner since proposal")]
    TradeConflict { trade: TradeId, item: ItemId },

    /// A trade with this ID already exists in the ledger.
    #[error("TP_ERR_305: Trade already exists: {0}")]
    DuplicateTrade(TradeId),

    // =================================================================
    // Purchase Errors (4xx)
    // =================================================================
    /// The purchase lost a race: the item changed owner between quote and
    /// transfer. No state changed.
    #[error("TP_ERR_400: Purchase conflict: item {item} was sold to someone else")]
    PurchaseConflict { item: ItemId },

    /// The purchase request violates a precondition (e.g. buying an item
    /// the buyer already owns).
    #[error("TP_ERR_401: Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    // =================================================================
    // Invariant Errors (8xx)
    // =================================================================
    /// Item conservation invariant violated — critical safety alert.
    #[error("TP_ERR_800: Item conservation violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TP_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TP_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config values, missing fields, etc.).
    #[error("TP_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error (disk, network).
    #[error("TP_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TradepostError>;

// Conversion from std::io::Error
impl From<std::io::Error> for TradepostError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
