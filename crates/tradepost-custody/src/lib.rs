//! # tradepost-custody
//!
//! **Custody Plane**: authoritative ownership records, marketplace
//! listings, the trade ledger, and the item conservation invariant.
//!
//! ## Architecture
//!
//! The Custody Plane is the persisted state the engines operate on:
//! 1. **OwnershipStore**: item → (game, owner) mapping with the
//!    optimistic transfer guard — the only component permitted to
//!    mutate ownership
//! 2. **ListingRegistry**: listed/unlisted flag and marketplace price,
//!    layered over the OwnershipStore
//! 3. **TradeLedger**: durable record of trade proposals and history
//! 4. **ItemConservation**: per-game item-count invariant checker
//!
//! ## Mutation Flow
//!
//! ```text
//! EscrowEngine ──▶ TradeLedger.create/set_acceptance/set_status
//!              ──▶ OwnershipStore.transfer_all   (dual acceptance)
//! Marketplace  ──▶ OwnershipStore.transfer ──▶ ListingRegistry.unlist
//! ```
//!
//! Every multi-step mutation runs under one exclusive borrow of these
//! stores, so partial application is never observable.

pub mod conservation;
pub mod ledger;
pub mod listing;
pub mod ownership;

pub use conservation::ItemConservation;
pub use ledger::TradeLedger;
pub use listing::ListingRegistry;
pub use ownership::{OwnershipRecord, OwnershipStore, Transfer};
