//! # tradepost-types
//!
//! Shared types, errors, and configuration for the **TradePost**
//! ownership & escrow engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`ItemId`], [`UserId`], [`GameId`], [`TradeId`]
//! - **Catalog records**: [`Item`], [`Game`], [`User`]
//! - **Trade model**: [`Trade`], [`TradeStatus`], [`TradeParty`]
//! - **Configuration**: [`EscrowConfig`], [`MarketplaceConfig`]
//! - **Errors**: [`TradepostError`] with `TP_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod item;
pub mod trade;
pub mod user;

// Re-export all primary types at crate root for ergonomic imports:
//   use tradepost_types::{Trade, TradeStatus, ItemId, ...};

pub use config::*;
pub use error::*;
pub use ids::*;
pub use item::*;
pub use trade::*;
pub use user::*;

// Constants are accessed via `tradepost_types::constants::FOO`
// (not re-exported to avoid name collisions).
