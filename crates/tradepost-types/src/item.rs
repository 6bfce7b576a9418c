//! Catalog item and game records.
//!
//! These are the records exchanged with the catalog service and with
//! callers. Inside the engine, listing truth lives in the
//! `ListingRegistry` and ownership truth in the `OwnershipStore`; the
//! `listed` and `price` fields here are the serialization-facing view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{GameId, ItemId};

/// A virtual item from a game's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable catalog identifier.
    pub id: ItemId,
    /// The game this item belongs to.
    pub game_id: GameId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Marketplace price (meaningful while listed).
    pub price: Decimal,
    /// Whether the item is currently listed on the marketplace.
    pub listed: bool,
}

impl Item {
    /// Returns `true` if the item carries a usable marketplace listing.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.listed && self.price >= Decimal::ZERO
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}' ({})", self.id, self.name, self.game_id)
    }
}

/// A game whose catalog the items come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.id, self.name)
    }
}

/// Dummy records for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl Item {
    /// Create a dummy unlisted item for unit tests.
    pub fn dummy(game_id: GameId) -> Self {
        Self {
            id: ItemId(rand::random::<u32>().into()),
            game_id,
            name: "Test Item".to_string(),
            description: String::new(),
            price: Decimal::ZERO,
            listed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item() -> Item {
        Item {
            id: ItemId(1),
            game_id: GameId(10),
            name: "Rocket Launcher".to_string(),
            description: "Fires rockets".to_string(),
            price: Decimal::new(995, 2),
            listed: true,
        }
    }

    #[test]
    fn purchasable_when_listed_with_price() {
        let item = make_item();
        assert!(item.is_purchasable());
    }

    #[test]
    fn not_purchasable_when_unlisted() {
        let mut item = make_item();
        item.listed = false;
        assert!(!item.is_purchasable());
    }

    #[test]
    fn item_display() {
        let item = make_item();
        let s = format!("{item}");
        assert!(s.contains("item:1"));
        assert!(s.contains("Rocket Launcher"));
    }

    #[test]
    fn item_serde_roundtrip() {
        let item = make_item();
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn game_serde_roundtrip() {
        let game = Game {
            id: GameId(3),
            name: "Space Shooter".to_string(),
        };
        let json = serde_json::to_string(&game).unwrap();
        let back: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(game, back);
    }
}
