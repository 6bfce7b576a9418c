//! User account records.
//!
//! Balance mutation (deposits, point awards) happens outside this engine;
//! the record exists for serialization toward callers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account identifier.
    pub id: UserId,
    /// Display name shown to other traders.
    pub display_name: String,
    /// Wallet balance in the marketplace currency.
    pub wallet: Decimal,
    /// Loyalty point balance.
    pub points: i64,
    /// Whether this account belongs to a game developer.
    pub developer: bool,
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.id, self.display_name)
    }
}

/// Dummy records for testing. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
impl User {
    /// Create a dummy user for unit tests.
    pub fn dummy(display_name: &str) -> Self {
        Self {
            id: UserId(rand::random::<u32>().into()),
            display_name: display_name.to_string(),
            wallet: Decimal::new(100_00, 2),
            points: 0,
            developer: false,
        }
    }
}
