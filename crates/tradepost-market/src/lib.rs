//! # tradepost-market
//!
//! **Marketplace Plane**: direct purchase of listed items.
//!
//! ## Purchase Flow
//!
//! ```text
//! caller ──▶ ListingRegistry.price_of ──▶ OwnershipStore.transfer
//!        ──▶ ListingRegistry.unlist  ──▶ PurchaseLog.append
//! ```
//!
//! The transfer step carries the optimistic guard: two purchases racing
//! on the same item resolve with exactly one transfer succeeding; the
//! loser observes a conflict and no state change. An item resold by
//! someone else is a terminal business fact — requests are never
//! retried automatically.

pub mod engine;
pub mod purchase_log;

pub use engine::MarketplaceEngine;
pub use purchase_log::{PurchaseLog, PurchaseRecord};
