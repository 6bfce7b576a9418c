//! Authoritative item-to-owner mapping.
//!
//! The OwnershipStore is the single source of truth for "who owns what"
//! and the only component permitted to mutate ownership. All mutations
//! are atomic: either the full operation succeeds or the mapping is
//! unchanged.

use std::collections::HashMap;

use tradepost_types::{GameId, ItemId, Result, TradepostError, UserId};

/// A single ownership record: the (user, game, item) tuple.
///
/// For a given item at most one record exists at any time. Transfer
/// replaces the whole record (delete + insert); records are never
/// partially updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub item: ItemId,
    pub game: GameId,
    pub owner: UserId,
}

/// One element of an atomic transfer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// The item to move.
    pub item: ItemId,
    /// The owner the caller believes currently holds the item.
    pub from: UserId,
    /// The owner the item moves to.
    pub to: UserId,
}

/// Authoritative record of item ownership.
///
/// The optimistic-concurrency guard lives here: [`OwnershipStore::transfer`]
/// requires the caller to state the owner it expects, and a mismatch is
/// the signal that a race occurred. No locks, no blocking waits.
pub struct OwnershipStore {
    /// One record per item currently held by any user.
    records: HashMap<ItemId, OwnershipRecord>,
}

impl OwnershipStore {
    /// Create a new empty ownership store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Admit an item into a user's inventory (seed or catalog grant).
    ///
    /// # Errors
    /// Returns [`TradepostError::DuplicateItem`] if the item already has
    /// an ownership record.
    pub fn admit(&mut self, item: ItemId, game: GameId, owner: UserId) -> Result<()> {
        if self.records.contains_key(&item) {
            return Err(TradepostError::DuplicateItem(item));
        }
        self.records.insert(item, OwnershipRecord { item, game, owner });
        Ok(())
    }

    /// Look up the current owner of an item.
    ///
    /// # Errors
    /// Returns [`TradepostError::ItemNotFound`] if the item has no record.
    pub fn owner_of(&self, item: ItemId) -> Result<UserId> {
        self.records
            .get(&item)
            .map(|r| r.owner)
            .ok_or(TradepostError::ItemNotFound(item))
    }

    /// Look up the full ownership record for an item.
    #[must_use]
    pub fn record(&self, item: ItemId) -> Option<&OwnershipRecord> {
        self.records.get(&item)
    }

    /// Atomically reassign an item from `expected_owner` to `new_owner`.
    ///
    /// This is the optimistic-concurrency guard against double-spend of
    /// the same item by two simultaneous trades/purchases: the record is
    /// replaced only if the current owner matches `expected_owner`.
    ///
    /// # Errors
    /// Returns [`TradepostError::OwnershipMismatch`] if no record matches
    /// the expected owner (someone else moved the item first, or it does
    /// not exist). The mapping is unchanged on error.
    pub fn transfer(
        &mut self,
        item: ItemId,
        expected_owner: UserId,
        new_owner: UserId,
    ) -> Result<()> {
        match self.records.get(&item) {
            Some(record) if record.owner == expected_owner => {
                let game = record.game;
                // Full replace, never a partial update.
                self.records.remove(&item);
                self.records.insert(
                    item,
                    OwnershipRecord {
                        item,
                        game,
                        owner: new_owner,
                    },
                );
                tracing::debug!(
                    item = %item,
                    from = %expected_owner,
                    to = %new_owner,
                    "Ownership transferred"
                );
                Ok(())
            }
            _ => Err(TradepostError::OwnershipMismatch {
                item,
                expected: expected_owner,
            }),
        }
    }

    /// Apply a transfer set all-or-nothing.
    ///
    /// Every expected owner is validated before anything is applied; the
    /// first mismatch aborts the whole set with the mapping unchanged.
    /// Transfers within the set act on disjoint items, so their relative
    /// order is immaterial.
    ///
    /// # Errors
    /// Returns [`TradepostError::OwnershipMismatch`] for the first element
    /// whose expected owner no longer holds the item. Nothing is applied.
    pub fn transfer_all(&mut self, transfers: &[Transfer]) -> Result<()> {
        for t in transfers {
            match self.records.get(&t.item) {
                Some(record) if record.owner == t.from => {}
                _ => {
                    return Err(TradepostError::OwnershipMismatch {
                        item: t.item,
                        expected: t.from,
                    });
                }
            }
        }
        for t in transfers {
            self.transfer(t.item, t.from, t.to)?;
        }
        Ok(())
    }

    /// All items currently owned by a user, sorted by item id.
    #[must_use]
    pub fn items_owned_by(&self, user: UserId) -> Vec<ItemId> {
        let mut items: Vec<ItemId> = self
            .records
            .values()
            .filter(|r| r.owner == user)
            .map(|r| r.item)
            .collect();
        items.sort_unstable();
        items
    }

    /// Number of items currently recorded for a game.
    #[must_use]
    pub fn items_in_game(&self, game: GameId) -> usize {
        self.records.values().filter(|r| r.game == game).count()
    }

    /// Whether an ownership record exists for the item.
    #[must_use]
    pub fn contains(&self, item: ItemId) -> bool {
        self.records.contains_key(&item)
    }

    /// Total number of ownership records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for OwnershipStore {
    fn default() -> Self {
        Self::new()
    }
}
