//! # Trade — the dual-acceptance escrow unit
//!
//! A [`Trade`] is a proposal to swap item sets between two users. Nothing
//! moves while the trade is in escrow; ownership transfers only at the
//! instant both parties have accepted.
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
//! Terminal states are immutable: once COMPLETED or DECLINED, no field of
//! the trade may change again. Callers never set status directly — the
//! escrow engine drives every transition through the guarded `mark_*`
//! methods here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GameId, ItemId, Result, TradeId, TradepostError, UserId};

/// The lifecycle status of a trade.
///
/// Transitions are **monotonic** (never go backwards):
/// - `Pending → Completed` (both parties accepted, transfers applied)
/// - `Pending → Declined` (either party declined)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeStatus {
    /// Proposed and in escrow. No ownership has moved.
    Pending,
    /// Both parties accepted and every transfer was applied.
    /// **Irreversible.**
    Completed,
    /// One party declined. **Irreversible.**
    Declined,
}

impl TradeStatus {
    /// Can this status transition to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Completed | Self::Declined)
        )
    }

    /// Returns `true` for COMPLETED and DECLINED.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Declined => write!(f, "DECLINED"),
        }
    }
}

/// Which side of a trade a user is acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeParty {
    /// The user who proposed the trade.
    Source,
    /// The user the trade was proposed to.
    Destination,
}

impl TradeParty {
    /// The other side of the trade.
    #[must_use]
    pub fn counterparty(self) -> Self {
        match self {
            Self::Source => Self::Destination,
            Self::Destination => Self::Source,
        }
    }
}

impl std::fmt::Display for TradeParty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "SOURCE"),
            Self::Destination => write!(f, "DESTINATION"),
        }
    }
}

/// A peer-to-peer trade proposal between two users.
///
/// The source user offers `source_items`; the destination user offers
/// `dest_items`. At proposal time every offered item must be owned by its
/// offering party and not listed — the escrow engine validates this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Globally unique trade identifier (UUIDv7, time-ordered).
    pub id: TradeId,
    /// The proposing user.
    pub source_user: UserId,
    /// The user the trade was proposed to.
    pub dest_user: UserId,
    /// The game all offered items belong to.
    pub game_id: GameId,
    /// Free-text description supplied by the proposer.
    pub description: String,
    /// Items offered by the source user.
    pub source_items: Vec<ItemId>,
    /// Items offered by the destination user.
    pub dest_items: Vec<ItemId>,
    /// Whether the source user has accepted. True from proposal.
    pub accepted_by_source: bool,
    /// Whether the destination user has accepted.
    pub accepted_by_destination: bool,
    /// Current lifecycle status.
    pub status: TradeStatus,
    /// When the trade was proposed.
    pub created_at: DateTime<Utc>,
}

impl Trade {
    /// Create a new PENDING trade. The proposer implicitly accepts.
    #[must_use]
    pub fn new(
        source_user: UserId,
        dest_user: UserId,
        game_id: GameId,
        description: impl Into<String>,
        source_items: Vec<ItemId>,
        dest_items: Vec<ItemId>,
    ) -> Self {
        Self {
            id: TradeId::new(),
            source_user,
            dest_user,
            game_id,
            description: description.into(),
            source_items,
            dest_items,
            accepted_by_source: true,
            accepted_by_destination: false,
            status: TradeStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Resolve which side of this trade a user is on, if any.
    #[must_use]
    pub fn party_of(&self, user: UserId) -> Option<TradeParty> {
        if user == self.source_user {
            Some(TradeParty::Source)
        } else if user == self.dest_user {
            Some(TradeParty::Destination)
        } else {
            None
        }
    }

    /// The acceptance flag for the given party.
    #[must_use]
    pub fn accepted_by(&self, party: TradeParty) -> bool {
        match party {
            TradeParty::Source => self.accepted_by_source,
            TradeParty::Destination => self.accepted_by_destination,
        }
    }

    /// Both parties have accepted; the trade is ready to complete.
    #[must_use]
    pub fn dual_accepted(&self) -> bool {
        self.accepted_by_source && self.accepted_by_destination
    }

    /// Whether the trade is still in escrow.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == TradeStatus::Pending
    }

    /// Whether the item appears in either offered set.
    #[must_use]
    pub fn involves_item(&self, item: ItemId) -> bool {
        self.source_items.contains(&item) || self.dest_items.contains(&item)
    }

    /// All items offered on either side.
    pub fn all_items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.source_items
            .iter()
            .chain(self.dest_items.iter())
            .copied()
    }

    /// Set the acceptance flag for a party. Idempotent for an already-set
    /// flag.
    ///
    /// # Errors
    /// Returns [`TradepostError::TradeNotPending`] if the trade is terminal.
    pub fn set_acceptance(&mut self, party: TradeParty, accepted: bool) -> Result<()> {
        self.ensure_pending()?;
        match party {
            TradeParty::Source => self.accepted_by_source = accepted,
            TradeParty::Destination => self.accepted_by_destination = accepted,
        }
        Ok(())
    }

    /// Attempt to transition to COMPLETED.
    ///
    /// # Errors
    /// - [`TradepostError::TradeNotPending`] if the trade is terminal
    /// - [`TradepostError::InvalidTrade`] if both flags are not yet true
    pub fn mark_completed(&mut self) -> Result<()> {
        self.ensure_pending()?;
        if !self.dual_accepted() {
            return Err(TradepostError::InvalidTrade {
                reason: format!("trade {} completed without dual acceptance", self.id),
            });
        }
        self.status = TradeStatus::Completed;
        Ok(())
    }

    /// Attempt to transition to DECLINED. Flags are frozen as they stand.
    ///
    /// # Errors
    /// Returns [`TradepostError::TradeNotPending`] if the trade is terminal.
    pub fn mark_declined(&mut self) -> Result<()> {
        self.ensure_pending()?;
        self.status = TradeStatus::Declined;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<()> {
        if self.status == TradeStatus::Pending {
            Ok(())
        } else {
            Err(TradepostError::TradeNotPending {
                trade: self.id,
                status: self.status,
            })
        }
    }
}

impl std::fmt::Display for Trade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Trade[{}] {} -> {} ({} for {}) {}",
            self.id,
            self.source_user,
            self.dest_user,
            self.source_items.len(),
            self.dest_items.len(),
            self.status,
        )
    }
}

/// Dummy trade for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Trade {
    /// Create a dummy one-for-one PENDING trade for unit tests.
    pub fn dummy(source_user: UserId, dest_user: UserId) -> Self {
        Self::new(
            source_user,
            dest_user,
            crate::GameId(rand::random::<u32>().into()),
            "dummy trade",
            vec![ItemId(rand::random::<u32>().into())],
            vec![ItemId(rand::random::<u32>().into())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade::new(
            UserId(1),
            UserId(2),
            GameId(10),
            "swap",
            vec![ItemId(100)],
            vec![ItemId(200)],
        )
    }

    #[test]
    fn proposal_defaults() {
        let t = make_trade();
        assert_eq!(t.status, TradeStatus::Pending);
        assert!(t.accepted_by_source, "proposer implicitly accepts");
        assert!(!t.accepted_by_destination);
        assert!(!t.dual_accepted());
    }

    #[test]
    fn status_transitions_valid() {
        assert!(TradeStatus::Pending.can_transition_to(TradeStatus::Completed));
        assert!(TradeStatus::Pending.can_transition_to(TradeStatus::Declined));
    }

    #[test]
    fn status_transitions_invalid() {
        assert!(!TradeStatus::Completed.can_transition_to(TradeStatus::Pending));
        assert!(!TradeStatus::Completed.can_transition_to(TradeStatus::Declined));
        assert!(!TradeStatus::Declined.can_transition_to(TradeStatus::Pending));
        assert!(!TradeStatus::Declined.can_transition_to(TradeStatus::Completed));
    }

    #[test]
    fn party_resolution() {
        let t = make_trade();
        assert_eq!(t.party_of(UserId(1)), Some(TradeParty::Source));
        assert_eq!(t.party_of(UserId(2)), Some(TradeParty::Destination));
        assert_eq!(t.party_of(UserId(3)), None);
    }

    #[test]
    fn counterparty_flips() {
        assert_eq!(TradeParty::Source.counterparty(), TradeParty::Destination);
        assert_eq!(TradeParty::Destination.counterparty(), TradeParty::Source);
    }

    #[test]
    fn complete_requires_dual_acceptance() {
        let mut t = make_trade();
        assert!(t.mark_completed().is_err(), "destination has not accepted");

        t.set_acceptance(TradeParty::Destination, true).unwrap();
        assert!(t.dual_accepted());
        t.mark_completed().unwrap();
        assert_eq!(t.status, TradeStatus::Completed);
    }

    #[test]
    fn terminal_trades_are_frozen() {
        let mut t = make_trade();
        t.mark_declined().unwrap();

        assert!(t.mark_completed().is_err(), "DECLINED -> COMPLETED must fail");
        assert!(t.mark_declined().is_err(), "DECLINED -> DECLINED must fail");
        let err = t.set_acceptance(TradeParty::Destination, true).unwrap_err();
        assert!(matches!(err, TradepostError::TradeNotPending { .. }));
    }

    #[test]
    fn decline_freezes_flags() {
        let mut t = make_trade();
        t.mark_declined().unwrap();
        assert!(t.accepted_by_source);
        assert!(!t.accepted_by_destination);
    }

    #[test]
    fn involves_item_checks_both_sets() {
        let t = make_trade();
        assert!(t.involves_item(ItemId(100)));
        assert!(t.involves_item(ItemId(200)));
        assert!(!t.involves_item(ItemId(300)));
    }

    #[test]
    fn all_items_spans_both_sets() {
        let t = make_trade();
        let items: Vec<ItemId> = t.all_items().collect();
        assert_eq!(items, vec![ItemId(100), ItemId(200)]);
    }

    #[test]
    fn trade_display() {
        let t = make_trade();
        let s = format!("{t}");
        assert!(s.contains("user:1"));
        assert!(s.contains("user:2"));
        assert!(s.contains("PENDING"));
    }

    #[test]
    fn serde_roundtrip() {
        let t = make_trade();
        let json = serde_json::to_string(&t).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(t.id, back.id);
        assert_eq!(t.source_items, back.source_items);
        assert_eq!(t.status, back.status);
        assert_eq!(t.accepted_by_source, back.accepted_by_source);
    }
}
