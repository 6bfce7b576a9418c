//! # tradepost-escrow
//!
//! **Escrow Plane**: the dual-acceptance trade protocol.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  both accepted  ┌───────────┐
//!   │ PENDING ├────────────────▶│ COMPLETED │
//!   └────┬────┘                 └───────────┘
//!        │ either party declines
//!        ▼
//!   ┌──────────┐
//!   │ DECLINED │
//!   └──────────┘
//! ```
//!
//! ## Protocol Properties
//!
//! - **Escrow**: a proposed trade moves nothing; ownership transfers
//!   only at the instant of dual acceptance
//! - **Atomic completion**: every item of a trade transfers in one
//!   all-or-nothing unit; a conflict leaves the trade PENDING with
//!   nothing applied
//! - **Optimistic guard**: the OwnershipStore transfer guard is the
//!   only concurrency-control primitive — no locks, no blocking waits
//! - **Terminal immutability**: COMPLETED and DECLINED trades admit no
//!   further mutation

pub mod engine;

pub use engine::EscrowEngine;
