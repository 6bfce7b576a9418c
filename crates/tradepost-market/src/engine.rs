//! Direct purchase of listed items.
//!
//! A purchase is one atomic unit: validate the listing, transfer
//! ownership from seller to buyer through the optimistic guard, unlist
//! the item. Either every step commits or none does — a lost race
//! surfaces as a conflict with no state change.

use tradepost_custody::{ListingRegistry, OwnershipStore};
use tradepost_types::{ItemId, MarketplaceConfig, Result, TradepostError, UserId};

use crate::purchase_log::{PurchaseLog, PurchaseRecord};

/// Executes marketplace purchases and keeps the purchase audit log.
pub struct MarketplaceEngine {
    log: PurchaseLog,
}

impl MarketplaceEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub fn new(config: &MarketplaceConfig) -> Self {
        Self {
            log: PurchaseLog::new(config.purchase_log_capacity),
        }
    }

    /// Buy a listed item. The seller is resolved at execution time.
    ///
    /// # Errors
    /// - [`TradepostError::NotListed`] if the item carries no listing
    /// - [`TradepostError::ItemNotFound`] if it has no ownership record
    /// - [`TradepostError::InvalidOperation`] if the buyer already owns it
    /// - [`TradepostError::PurchaseConflict`] if the transfer guard
    ///   detected a race — no state changed
    pub fn buy(
        &mut self,
        ownership: &mut OwnershipStore,
        listings: &mut ListingRegistry,
        item: ItemId,
        buyer: UserId,
    ) -> Result<PurchaseRecord> {
        let seller = ownership.owner_of(item)?;
        self.buy_from(ownership, listings, item, seller, buyer)
    }

    /// Buy a listed item from the seller the caller observed when it
    /// quoted the listing. A request that raced against an interim sale
    /// fails on the stale seller with [`TradepostError::PurchaseConflict`]
    /// and changes nothing.
    pub fn buy_from(
        &mut self,
        ownership: &mut OwnershipStore,
        listings: &mut ListingRegistry,
        item: ItemId,
        expected_seller: UserId,
        buyer: UserId,
    ) -> Result<PurchaseRecord> {
        let Some(price) = listings.price_of(item) else {
            return Err(TradepostError::NotListed(item));
        };
        if expected_seller == buyer {
            return Err(TradepostError::InvalidOperation {
                reason: format!("{buyer} already owns {item}"),
            });
        }

        if let Err(err) = ownership.transfer(item, expected_seller, buyer) {
            match err {
                TradepostError::OwnershipMismatch { .. } => {
                    // An item resold by someone else is a terminal business
                    // fact for this request; the caller must not auto-retry.
                    tracing::warn!(
                        item = %item,
                        expected_seller = %expected_seller,
                        buyer = %buyer,
                        "Purchase aborted: item changed owner"
                    );
                    return Err(TradepostError::PurchaseConflict { item });
                }
                other => return Err(other),
            }
        }
        listings.unlist(item);

        let record = PurchaseRecord {
            item,
            seller: expected_seller,
            buyer,
            price,
            executed_at: chrono::Utc::now(),
        };
        tracing::info!(
            item = %item,
            seller = %expected_seller,
            buyer = %buyer,
            price = %price,
            "Purchase completed"
        );
        self.log.append(record.clone());
        Ok(record)
    }

    /// The purchase audit log.
    #[must_use]
    pub fn log(&self) -> &PurchaseLog {
        &self.log
    }
}

impl Default for MarketplaceEngine {
    fn default() -> Self {
        Self::new(&MarketplaceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tradepost_custody::TradeLedger;
    use tradepost_types::GameId;

    const GAME: GameId = GameId(1);
    const SELLER: UserId = UserId(1);
    const BUYER: UserId = UserId(2);
    const OTHER: UserId = UserId(3);

    fn setup() -> (MarketplaceEngine, OwnershipStore, ListingRegistry, TradeLedger) {
        let mut ownership = OwnershipStore::new();
        ownership.admit(ItemId(5), GAME, SELLER).unwrap();
        (
            MarketplaceEngine::default(),
            ownership,
            ListingRegistry::new(),
            TradeLedger::new(),
        )
    }

    fn list(
        ownership: &OwnershipStore,
        ledger: &TradeLedger,
        listings: &mut ListingRegistry,
        item: ItemId,
        price: Decimal,
    ) {
        listings.list(ownership, ledger, item, price).unwrap();
    }

    #[test]
    fn buy_transfers_and_unlists() {
        let (mut engine, mut ownership, mut listings, ledger) = setup();
        list(&ownership, &ledger, &mut listings, ItemId(5), Decimal::new(1000, 2));

        let record = engine
            .buy(&mut ownership, &mut listings, ItemId(5), BUYER)
            .unwrap();

        assert_eq!(record.seller, SELLER);
        assert_eq!(record.buyer, BUYER);
        assert_eq!(record.price, Decimal::new(1000, 2));
        assert_eq!(ownership.owner_of(ItemId(5)).unwrap(), BUYER);
        assert!(!listings.is_listed(ItemId(5)));
        assert_eq!(engine.log().len(), 1);
    }

    #[test]
    fn buy_unlisted_item_rejected() {
        let (mut engine, mut ownership, mut listings, _ledger) = setup();
        let err = engine
            .buy(&mut ownership, &mut listings, ItemId(5), BUYER)
            .unwrap_err();
        assert!(matches!(err, TradepostError::NotListed(ItemId(5))));
        assert_eq!(ownership.owner_of(ItemId(5)).unwrap(), SELLER);
    }

    #[test]
    fn buy_own_item_rejected() {
        let (mut engine, mut ownership, mut listings, ledger) = setup();
        list(&ownership, &ledger, &mut listings, ItemId(5), Decimal::ONE);

        let err = engine
            .buy(&mut ownership, &mut listings, ItemId(5), SELLER)
            .unwrap_err();
        assert!(matches!(err, TradepostError::InvalidOperation { .. }));
        assert!(listings.is_listed(ItemId(5)), "listing untouched");
    }

    #[test]
    fn buy_unknown_item_rejected() {
        let (mut engine, mut ownership, mut listings, _ledger) = setup();
        let err = engine
            .buy(&mut ownership, &mut listings, ItemId(99), BUYER)
            .unwrap_err();
        assert!(matches!(err, TradepostError::ItemNotFound(ItemId(99))));
    }

    #[test]
    fn stale_quote_conflicts_without_state_change() {
        let (mut engine, mut ownership, mut listings, ledger) = setup();
        list(&ownership, &ledger, &mut listings, ItemId(5), Decimal::ONE);

        // First purchase commits; the new owner relists.
        engine
            .buy(&mut ownership, &mut listings, ItemId(5), BUYER)
            .unwrap();
        list(&ownership, &ledger, &mut listings, ItemId(5), Decimal::TWO);

        // A request still quoting the original seller loses the race.
        let err = engine
            .buy_from(&mut ownership, &mut listings, ItemId(5), SELLER, OTHER)
            .unwrap_err();
        assert!(matches!(err, TradepostError::PurchaseConflict { item: ItemId(5) }));

        // No state change: still owned by the first buyer, still listed.
        assert_eq!(ownership.owner_of(ItemId(5)).unwrap(), BUYER);
        assert!(listings.is_listed(ItemId(5)));
        assert_eq!(engine.log().len(), 1);
    }

    #[test]
    fn second_buy_after_commit_sees_unlisted() {
        let (mut engine, mut ownership, mut listings, ledger) = setup();
        list(&ownership, &ledger, &mut listings, ItemId(5), Decimal::ONE);

        engine
            .buy(&mut ownership, &mut listings, ItemId(5), BUYER)
            .unwrap();

        // Exactly one transfer succeeds; the loser gets a clean rejection.
        let err = engine
            .buy(&mut ownership, &mut listings, ItemId(5), OTHER)
            .unwrap_err();
        assert!(matches!(err, TradepostError::NotListed(ItemId(5))));
        assert_eq!(ownership.owner_of(ItemId(5)).unwrap(), BUYER);
    }

    #[test]
    fn log_records_purchases_and_sales() {
        let (mut engine, mut ownership, mut listings, ledger) = setup();
        list(&ownership, &ledger, &mut listings, ItemId(5), Decimal::ONE);
        engine
            .buy(&mut ownership, &mut listings, ItemId(5), BUYER)
            .unwrap();

        assert_eq!(engine.log().purchases_for(BUYER).len(), 1);
        assert_eq!(engine.log().sales_for(SELLER).len(), 1);
        assert!(engine.log().purchases_for(SELLER).is_empty());
    }
}
