//! Configuration types for the TradePost engines.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the escrow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Maximum items either side of a trade may offer.
    pub max_items_per_trade: usize,
    /// Maximum length of a trade's free-text description.
    pub max_description_len: usize,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            max_items_per_trade: constants::DEFAULT_MAX_ITEMS_PER_TRADE,
            max_description_len: constants::DEFAULT_MAX_DESCRIPTION_LEN,
        }
    }
}

/// Configuration for the marketplace purchase engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Purchase log capacity before the oldest records are evicted.
    pub purchase_log_capacity: usize,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            purchase_log_capacity: constants::PURCHASE_LOG_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escrow_config_defaults() {
        let cfg = EscrowConfig::default();
        assert_eq!(cfg.max_items_per_trade, 32);
        assert_eq!(cfg.max_description_len, 512);
    }

    #[test]
    fn marketplace_config_defaults() {
        let cfg = MarketplaceConfig::default();
        assert!(cfg.purchase_log_capacity > 0);
    }

    #[test]
    fn escrow_config_serde_roundtrip() {
        let cfg = EscrowConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EscrowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.max_items_per_trade, back.max_items_per_trade);
        assert_eq!(cfg.max_description_len, back.max_description_len);
    }
}
