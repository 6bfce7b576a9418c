//! Marketplace visibility and pricing of items.
//!
//! The ListingRegistry is layered over the OwnershipStore: an item is
//! listed iff the registry holds a price for it. Listing and pending
//! trades are mutually exclusive — `list` refuses items referenced by a
//! pending trade, and the escrow engine refuses listed items at proposal
//! time.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tradepost_types::{ItemId, Result, TradepostError};

use crate::{OwnershipStore, TradeLedger};

/// Per-item marketplace listing state.
pub struct ListingRegistry {
    /// Items currently listed, with their marketplace price.
    listings: HashMap<ItemId, Decimal>,
}

impl ListingRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listings: HashMap::new(),
        }
    }

    /// List an item for sale at the given price. Relisting an already
    /// listed item updates its price.
    ///
    /// # Errors
    /// - [`TradepostError::ItemNotFound`] if the item has no ownership
    ///   record
    /// - [`TradepostError::InvalidPrice`] if `price < 0`
    /// - [`TradepostError::ListingBlocked`] if a pending trade references
    ///   the item
    pub fn list(
        &mut self,
        ownership: &OwnershipStore,
        ledger: &TradeLedger,
        item: ItemId,
        price: Decimal,
    ) -> Result<()> {
        if !ownership.contains(item) {
            return Err(TradepostError::ItemNotFound(item));
        }
        if price < Decimal::ZERO {
            return Err(TradepostError::InvalidPrice { price });
        }
        if let Some(trade) = ledger.pending_references_item(item) {
            return Err(TradepostError::ListingBlocked { item, trade });
        }

        self.listings.insert(item, price);
        tracing::debug!(item = %item, price = %price, "Item listed");
        Ok(())
    }

    /// Remove an item's listing. Idempotent: unlisting an unlisted item
    /// is a no-op.
    pub fn unlist(&mut self, item: ItemId) {
        if self.listings.remove(&item).is_some() {
            tracing::debug!(item = %item, "Item unlisted");
        }
    }

    /// Whether the item is currently listed.
    #[must_use]
    pub fn is_listed(&self, item: ItemId) -> bool {
        self.listings.contains_key(&item)
    }

    /// The listed price of an item, if listed.
    #[must_use]
    pub fn price_of(&self, item: ItemId) -> Option<Decimal> {
        self.listings.get(&item).copied()
    }

    /// All listed items with their prices, sorted by item id.
    #[must_use]
    pub fn listed_items(&self) -> Vec<(ItemId, Decimal)> {
        let mut items: Vec<(ItemId, Decimal)> =
            self.listings.iter().map(|(i, p)| (*i, *p)).collect();
        items.sort_unstable_by_key(|(i, _)| *i);
        items
    }

    /// Number of active listings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether no items are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl Default for ListingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradepost_types::{GameId, Trade, UserId};

    fn setup() -> (OwnershipStore, TradeLedger, ListingRegistry) {
        let mut ownership = OwnershipStore::new();
        ownership.admit(ItemId(1), GameId(1), UserId(10)).unwrap();
        ownership.admit(ItemId(2), GameId(1), UserId(20)).unwrap();
        (ownership, TradeLedger::new(), ListingRegistry::new())
    }

    #[test]
    fn list_and_query() {
        let (ownership, ledger, mut registry) = setup();
        registry
            .list(&ownership, &ledger, ItemId(1), Decimal::new(1000, 2))
            .unwrap();

        assert!(registry.is_listed(ItemId(1)));
        assert_eq!(registry.price_of(ItemId(1)), Some(Decimal::new(1000, 2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn list_unknown_item_fails() {
        let (ownership, ledger, mut registry) = setup();
        let err = registry
            .list(&ownership, &ledger, ItemId(99), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, TradepostError::ItemNotFound(ItemId(99))));
    }

    #[test]
    fn negative_price_rejected() {
        let (ownership, ledger, mut registry) = setup();
        let err = registry
            .list(&ownership, &ledger, ItemId(1), Decimal::new(-1, 0))
            .unwrap_err();
        assert!(matches!(err, TradepostError::InvalidPrice { .. }));
        assert!(!registry.is_listed(ItemId(1)));
    }

    #[test]
    fn zero_price_allowed() {
        let (ownership, ledger, mut registry) = setup();
        registry
            .list(&ownership, &ledger, ItemId(1), Decimal::ZERO)
            .unwrap();
        assert!(registry.is_listed(ItemId(1)));
    }

    #[test]
    fn pending_trade_blocks_listing() {
        let (ownership, mut ledger, mut registry) = setup();
        let trade = Trade::new(
            UserId(10),
            UserId(20),
            GameId(1),
            "swap",
            vec![ItemId(1)],
            vec![ItemId(2)],
        );
        let trade_id = ledger.create(trade).unwrap();

        let err = registry
            .list(&ownership, &ledger, ItemId(1), Decimal::ONE)
            .unwrap_err();
        assert!(matches!(
            err,
            TradepostError::ListingBlocked { item: ItemId(1), trade } if trade == trade_id
        ));
    }

    #[test]
    fn unlist_is_idempotent() {
        let (ownership, ledger, mut registry) = setup();
        registry
            .list(&ownership, &ledger, ItemId(1), Decimal::ONE)
            .unwrap();

        registry.unlist(ItemId(1));
        assert!(!registry.is_listed(ItemId(1)));

        // Second unlist: same observable state, no error.
        registry.unlist(ItemId(1));
        assert!(!registry.is_listed(ItemId(1)));
        assert!(registry.is_empty());
    }

    #[test]
    fn relisting_updates_price() {
        let (ownership, ledger, mut registry) = setup();
        registry
            .list(&ownership, &ledger, ItemId(1), Decimal::ONE)
            .unwrap();
        registry
            .list(&ownership, &ledger, ItemId(1), Decimal::TWO)
            .unwrap();
        assert_eq!(registry.price_of(ItemId(1)), Some(Decimal::TWO));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn listed_items_sorted() {
        let (mut ownership, ledger, mut registry) = setup();
        ownership.admit(ItemId(5), GameId(1), UserId(10)).unwrap();
        registry
            .list(&ownership, &ledger, ItemId(5), Decimal::ONE)
            .unwrap();
        registry
            .list(&ownership, &ledger, ItemId(1), Decimal::TWO)
            .unwrap();

        let items = registry.listed_items();
        assert_eq!(items[0].0, ItemId(1));
        assert_eq!(items[1].0, ItemId(5));
    }
}
