//! Trade state: the existence-based order record.
//!
//! A trade state carries almost nothing. Its *presence* at the address
//! derived from `(wallet, house, asset account, currency, mint, price,
//! size)` is the order; creation and deletion are its only mutations.
//!
//! ```text
//!   (absent) ── sell / buy ──▶ (present) ── cancel / execute-sale ──▶ (absent)
//! ```

use serde::{Deserialize, Serialize};

/// Which side posted the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Payload of a live order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeState {
    /// Bump needed to re-derive (and therefore close) this record.
    pub bump: u8,
    /// Sell records hold an asset delegation that cancel must revoke.
    pub side: OrderSide,
}

impl TradeState {
    #[must_use]
    pub fn new(bump: u8, side: OrderSide) -> Self {
        Self { bump, side }
    }

    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side == OrderSide::Sell
    }
}
