//! Item conservation invariant checker.
//!
//! Mathematical invariant enforced after every transfer cycle:
//! ```text
//! ∀ game: |ownership records for game| == |items admitted for game|
//! ```
//!
//! Transfers move items between users; they never create or destroy
//! them. If this invariant ever breaks, something has gone
//! catastrophically wrong and the operator must halt.

use std::collections::HashMap;

use tradepost_types::{GameId, Result, TradepostError};

/// Tracks per-game admitted-item counts and validates conservation
/// against the ownership store's actual counts.
pub struct ItemConservation {
    /// Items admitted per game since genesis.
    admitted: HashMap<GameId, usize>,
}

impl ItemConservation {
    /// Create a new conservation tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            admitted: HashMap::new(),
        }
    }

    /// Record an item admission for a game.
    pub fn record_admission(&mut self, game: GameId) {
        *self.admitted.entry(game).or_insert(0) += 1;
    }

    /// Expected item count for a game.
    #[must_use]
    pub fn expected_count(&self, game: GameId) -> usize {
        self.admitted.get(&game).copied().unwrap_or(0)
    }

    /// Verify that the actual item count for a game matches the number
    /// of items admitted for it.
    ///
    /// # Errors
    /// Returns [`TradepostError::ConservationViolation`] if actual ≠ expected.
    pub fn verify(&self, game: GameId, actual_count: usize) -> Result<()> {
        let expected = self.expected_count(game);
        if actual_count != expected {
            return Err(TradepostError::ConservationViolation {
                reason: format!(
                    "{game}: actual item count {actual_count} != admitted {expected}"
                ),
            });
        }
        Ok(())
    }

    /// All games with admitted items.
    #[must_use]
    pub fn tracked_games(&self) -> Vec<GameId> {
        self.admitted.keys().copied().collect()
    }
}

impl Default for ItemConservation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_count_is_zero() {
        let ic = ItemConservation::new();
        assert_eq!(ic.expected_count(GameId(1)), 0);
        assert!(ic.verify(GameId(1), 0).is_ok());
    }

    #[test]
    fn admissions_increase_expected() {
        let mut ic = ItemConservation::new();
        ic.record_admission(GameId(1));
        ic.record_admission(GameId(1));
        assert_eq!(ic.expected_count(GameId(1)), 2);
    }

    #[test]
    fn verify_passes_when_balanced() {
        let mut ic = ItemConservation::new();
        ic.record_admission(GameId(1));
        ic.record_admission(GameId(1));
        ic.record_admission(GameId(1));
        assert!(ic.verify(GameId(1), 3).is_ok());
    }

    #[test]
    fn verify_fails_when_imbalanced() {
        let mut ic = ItemConservation::new();
        ic.record_admission(GameId(1));
        let err = ic.verify(GameId(1), 2).unwrap_err();
        assert!(matches!(err, TradepostError::ConservationViolation { .. }));
    }

    #[test]
    fn multiple_games_independent() {
        let mut ic = ItemConservation::new();
        ic.record_admission(GameId(1));
        ic.record_admission(GameId(2));
        ic.record_admission(GameId(2));
        assert_eq!(ic.expected_count(GameId(1)), 1);
        assert_eq!(ic.expected_count(GameId(2)), 2);
        assert!(ic.verify(GameId(1), 1).is_ok());
        assert!(ic.verify(GameId(2), 2).is_ok());
    }

    #[test]
    fn transfers_do_not_change_counts() {
        // After a trade or purchase: items move between users but the
        // per-game count is unchanged — no admissions, no deletions.
        let mut ic = ItemConservation::new();
        ic.record_admission(GameId(1));
        ic.record_admission(GameId(1));
        assert!(ic.verify(GameId(1), 2).is_ok());
    }
}
