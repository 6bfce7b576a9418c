//! System-wide constants for the TradePost engine.

/// Maximum decimal precision for marketplace prices (2 decimal places).
pub const PRICE_PRECISION: u32 = 2;

/// Maximum items either side of a trade may offer (default).
pub const DEFAULT_MAX_ITEMS_PER_TRADE: usize = 32;

/// Maximum length of a trade's free-text description (default).
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 512;

/// Purchase log capacity (number of purchase records to remember).
pub const PURCHASE_LOG_CAPACITY: usize = 500_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TradePost";
