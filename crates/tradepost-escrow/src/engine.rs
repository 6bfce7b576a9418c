//! The dual-acceptance escrow state machine.
//!
//! The EscrowEngine validates trade proposals, records acceptances, and
//! on dual acceptance atomically transfers every involved item through
//! the OwnershipStore. Completion either fully succeeds or leaves the
//! trade PENDING — no partial transfer is ever observable, and no
//! detached work outlives the call.

use tradepost_custody::{ListingRegistry, OwnershipStore, TradeLedger, Transfer};
use tradepost_types::{
    EscrowConfig, GameId, ItemId, Result, Trade, TradeId, TradeParty, TradeStatus,
    TradepostError, UserId,
};

/// Drives the `Pending → Completed | Declined` trade lifecycle.
///
/// The engine holds no trade state itself; the TradeLedger is the
/// record of truth and the custody stores are passed as explicit
/// collaborators. One call, one atomic unit.
pub struct EscrowEngine {
    config: EscrowConfig,
}

impl EscrowEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: EscrowConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Propose a trade: `source_user` offers `source_items` to
    /// `dest_user` in exchange for `dest_items`.
    ///
    /// The proposer implicitly accepts; the trade is persisted PENDING
    /// and nothing moves until the destination accepts too.
    ///
    /// # Errors
    /// Returns [`TradepostError::InvalidTrade`] when any precondition
    /// fails: same user on both sides, empty or overlapping item sets,
    /// configured bounds exceeded, or an offered item that is not owned
    /// by its offering party, belongs to another game, or is listed.
    #[allow(clippy::too_many_arguments)]
    pub fn propose(
        &self,
        ownership: &OwnershipStore,
        listings: &ListingRegistry,
        ledger: &mut TradeLedger,
        source_user: UserId,
        dest_user: UserId,
        game: GameId,
        description: &str,
        source_items: Vec<ItemId>,
        dest_items: Vec<ItemId>,
    ) -> Result<TradeId> {
        if source_user == dest_user {
            return Err(invalid_trade(format!(
                "source and destination are the same user ({source_user})"
            )));
        }
        if source_items.is_empty() && dest_items.is_empty() {
            return Err(invalid_trade("a trade must move at least one item"));
        }
        if source_items.len() > self.config.max_items_per_trade
            || dest_items.len() > self.config.max_items_per_trade
        {
            return Err(invalid_trade(format!(
                "item set exceeds {} items",
                self.config.max_items_per_trade
            )));
        }
        if description.len() > self.config.max_description_len {
            return Err(invalid_trade(format!(
                "description exceeds {} bytes",
                self.config.max_description_len
            )));
        }
        if has_duplicates(&source_items) || has_duplicates(&dest_items) {
            return Err(invalid_trade("an item appears twice in an offer"));
        }
        if let Some(item) = source_items.iter().find(|i| dest_items.contains(i)) {
            return Err(invalid_trade(format!(
                "{item} appears on both sides of the trade"
            )));
        }

        validate_offer(ownership, listings, source_user, game, &source_items)?;
        validate_offer(ownership, listings, dest_user, game, &dest_items)?;

        let trade = Trade::new(
            source_user,
            dest_user,
            game,
            description,
            source_items,
            dest_items,
        );
        let id = ledger.create(trade)?;
        tracing::info!(
            trade = %id,
            source = %source_user,
            dest = %dest_user,
            game = %game,
            "Trade proposed"
        );
        Ok(id)
    }

    /// Record a party's acceptance. The instant both flags are true the
    /// engine completes the trade; the caller observes the resulting
    /// status synchronously.
    ///
    /// # Errors
    /// - [`TradepostError::TradeNotFound`] if the trade is absent
    /// - [`TradepostError::TradeNotPending`] if the trade is terminal
    /// - [`TradepostError::Unauthorized`] if `acting_user` is not a
    ///   participant
    /// - [`TradepostError::TradeConflict`] if completion found an item
    ///   moved since proposal — the trade stays PENDING, flags intact,
    ///   open for retry or decline
    pub fn accept(
        &self,
        ownership: &mut OwnershipStore,
        ledger: &mut TradeLedger,
        trade_id: TradeId,
        acting_user: UserId,
    ) -> Result<TradeStatus> {
        let party = authorize(ledger, trade_id, acting_user)?;
        ledger.set_acceptance(trade_id, party, true)?;
        tracing::debug!(trade = %trade_id, user = %acting_user, party = %party, "Trade accepted");

        // Both flags are checked explicitly: either side may end up the
        // later accepter, whichever side proposed.
        if ledger.get(trade_id)?.dual_accepted() {
            complete(ownership, ledger, trade_id)?;
        }
        Ok(ledger.get(trade_id)?.status)
    }

    /// Decline a pending trade. Unilateral: either party may decline
    /// regardless of prior acceptance state. Flags freeze as they stand.
    ///
    /// # Errors
    /// Same guards as [`EscrowEngine::accept`] except conflicts cannot
    /// occur — nothing moves on decline.
    pub fn decline(
        &self,
        ledger: &mut TradeLedger,
        trade_id: TradeId,
        acting_user: UserId,
    ) -> Result<()> {
        let party = authorize(ledger, trade_id, acting_user)?;
        ledger.set_status(trade_id, TradeStatus::Declined)?;
        tracing::info!(trade = %trade_id, user = %acting_user, party = %party, "Trade declined");
        Ok(())
    }

}

impl Default for EscrowEngine {
    fn default() -> Self {
        Self::new(EscrowConfig::default())
    }
}

/// Complete a dual-accepted trade: move every source item to the
/// destination user and every destination item to the source user, as
/// one atomic unit. Triggered only from [`EscrowEngine::accept`].
fn complete(
    ownership: &mut OwnershipStore,
    ledger: &mut TradeLedger,
    trade_id: TradeId,
) -> Result<()> {
    let (transfers, source_user, dest_user) = {
        let trade = ledger.get(trade_id)?;
        let mut transfers = Vec::with_capacity(trade.source_items.len() + trade.dest_items.len());
        transfers.extend(trade.source_items.iter().map(|&item| Transfer {
            item,
            from: trade.source_user,
            to: trade.dest_user,
        }));
        transfers.extend(trade.dest_items.iter().map(|&item| Transfer {
            item,
            from: trade.dest_user,
            to: trade.source_user,
        }));
        (transfers, trade.source_user, trade.dest_user)
    };

    if let Err(err) = ownership.transfer_all(&transfers) {
        // An item was sold or traded away since proposal. Nothing was
        // applied; the trade stays PENDING for manual retry/decline.
        let item = match err {
            TradepostError::OwnershipMismatch { item, .. } => item,
            other => return Err(other),
        };
        tracing::warn!(
            trade = %trade_id,
            item = %item,
            "Trade completion aborted: item changed owner since proposal"
        );
        return Err(TradepostError::TradeConflict {
            trade: trade_id,
            item,
        });
    }

    ledger.set_status(trade_id, TradeStatus::Completed)?;
    tracing::info!(
        trade = %trade_id,
        source = %source_user,
        dest = %dest_user,
        items = transfers.len(),
        "Trade completed"
    );
    Ok(())
}

/// Resolve the acting user's side of a pending trade.
fn authorize(ledger: &TradeLedger, trade_id: TradeId, acting_user: UserId) -> Result<TradeParty> {
    let trade = ledger.get(trade_id)?;
    if !trade.is_pending() {
        return Err(TradepostError::TradeNotPending {
            trade: trade_id,
            status: trade.status,
        });
    }
    trade
        .party_of(acting_user)
        .ok_or(TradepostError::Unauthorized {
            user: acting_user,
            trade: trade_id,
        })
}

/// Check that every offered item exists, is owned by the offering party,
/// belongs to the trade's game, and is not listed.
fn validate_offer(
    ownership: &OwnershipStore,
    listings: &ListingRegistry,
    offerer: UserId,
    game: GameId,
    items: &[ItemId],
) -> Result<()> {
    for &item in items {
        let Some(record) = ownership.record(item) else {
            return Err(invalid_trade(format!("{item} does not exist")));
        };
        if record.owner != offerer {
            return Err(invalid_trade(format!("{item} is not owned by {offerer}")));
        }
        if record.game != game {
            return Err(invalid_trade(format!("{item} does not belong to {game}")));
        }
        if listings.is_listed(item) {
            return Err(invalid_trade(format!(
                "{item} is listed on the marketplace"
            )));
        }
    }
    Ok(())
}

fn invalid_trade(reason: impl Into<String>) -> TradepostError {
    TradepostError::InvalidTrade {
        reason: reason.into(),
    }
}

fn has_duplicates(items: &[ItemId]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items.iter().any(|i| !seen.insert(*i))
}
