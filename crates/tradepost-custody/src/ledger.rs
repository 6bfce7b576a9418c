//! Durable record of trade proposals and their history.
//!
//! The TradeLedger is pure storage: it persists trades, applies the
//! invariant-checked field mutations the escrow engine asks for, and
//! answers participant/status queries. It never decides transitions
//! itself — that is the escrow engine's job.
//!
//! History queries return most-recent-first. Trade ids are UUIDv7, so
//! creation order is a reverse sort on the id.

use std::collections::HashMap;

use tradepost_types::{
    ItemId, Result, Trade, TradeId, TradeParty, TradeStatus, TradepostError, UserId,
};

/// In-memory trade store keyed by trade id.
pub struct TradeLedger {
    trades: HashMap<TradeId, Trade>,
}

impl TradeLedger {
    /// Create a new empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trades: HashMap::new(),
        }
    }

    /// Persist a new trade.
    ///
    /// # Errors
    /// Returns [`TradepostError::DuplicateTrade`] if a trade with this id
    /// already exists.
    pub fn create(&mut self, trade: Trade) -> Result<TradeId> {
        let id = trade.id;
        if self.trades.contains_key(&id) {
            return Err(TradepostError::DuplicateTrade(id));
        }
        tracing::debug!(trade = %id, source = %trade.source_user, dest = %trade.dest_user, "Trade persisted");
        self.trades.insert(id, trade);
        Ok(id)
    }

    /// Look up a trade by id.
    ///
    /// # Errors
    /// Returns [`TradepostError::TradeNotFound`] if absent.
    pub fn get(&self, id: TradeId) -> Result<&Trade> {
        self.trades.get(&id).ok_or(TradepostError::TradeNotFound(id))
    }

    /// Set a party's acceptance flag.
    ///
    /// # Errors
    /// - [`TradepostError::TradeNotFound`] if the trade is absent
    /// - [`TradepostError::TradeNotPending`] if the trade is terminal
    pub fn set_acceptance(&mut self, id: TradeId, party: TradeParty, accepted: bool) -> Result<()> {
        let trade = self
            .trades
            .get_mut(&id)
            .ok_or(TradepostError::TradeNotFound(id))?;
        trade.set_acceptance(party, accepted)
    }

    /// Transition a trade's status. Only `Pending → Completed` and
    /// `Pending → Declined` are legal; the `Trade` transition guards
    /// enforce this.
    ///
    /// # Errors
    /// - [`TradepostError::TradeNotFound`] if the trade is absent
    /// - [`TradepostError::TradeNotPending`] if the trade is terminal
    /// - [`TradepostError::InvalidTrade`] for `Completed` without dual
    ///   acceptance
    pub fn set_status(&mut self, id: TradeId, status: TradeStatus) -> Result<()> {
        let trade = self
            .trades
            .get_mut(&id)
            .ok_or(TradepostError::TradeNotFound(id))?;
        match status {
            TradeStatus::Completed => trade.mark_completed(),
            TradeStatus::Declined => trade.mark_declined(),
            TradeStatus::Pending => Err(TradepostError::Internal(format!(
                "trade {id} cannot be reset to PENDING"
            ))),
        }
    }

    /// All pending trades a user participates in, most recent first.
    #[must_use]
    pub fn active_trades_for(&self, user: UserId) -> Vec<&Trade> {
        self.select(|t| t.is_pending() && t.party_of(user).is_some())
    }

    /// All terminal trades a user participated in, most recent first.
    #[must_use]
    pub fn history_for(&self, user: UserId) -> Vec<&Trade> {
        self.select(|t| t.status.is_terminal() && t.party_of(user).is_some())
    }

    /// Whether any pending trade references the item on either side.
    /// Used by the listing registry for trade/listing mutual exclusion.
    #[must_use]
    pub fn pending_references_item(&self, item: ItemId) -> Option<TradeId> {
        self.trades
            .values()
            .find(|t| t.is_pending() && t.involves_item(item))
            .map(|t| t.id)
    }

    /// Number of trades recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    fn select(&self, pred: impl Fn(&Trade) -> bool) -> Vec<&Trade> {
        let mut out: Vec<&Trade> = self.trades.values().filter(|t| pred(t)).collect();
        out.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        out
    }
}

impl Default for TradeLedger {
    fn default() -> Self {
        Self::new()
    }
}
