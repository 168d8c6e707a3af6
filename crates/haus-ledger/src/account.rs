//! Accounts: lamports plus one typed payload.

use haus_types::{constants, AuctionHouse, TradeState, Vault};
use serde::{Deserialize, Serialize};

use crate::token::TokenAccount;

/// Typed payload of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountData {
    /// A plain wallet with no data.
    System,
    Token(TokenAccount),
    AuctionHouse(AuctionHouse),
    TradeState(TradeState),
    Vault(Vault),
}

impl AccountData {
    /// Serialized size used by the rent schedule.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::System => 0,
            Self::Token(_) => constants::TOKEN_ACCOUNT_SIZE,
            Self::AuctionHouse(_) => constants::AUCTION_HOUSE_SIZE,
            Self::TradeState(_) => constants::TRADE_STATE_SIZE,
            Self::Vault(_) => constants::VAULT_SIZE,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::System => "system account",
            Self::Token(_) => "token account",
            Self::AuctionHouse(_) => "auction house",
            Self::TradeState(_) => "trade state",
            Self::Vault(_) => "vault",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub lamports: u64,
    pub data: AccountData,
}

impl Account {
    #[must_use]
    pub fn system(lamports: u64) -> Self {
        Self {
            lamports,
            data: AccountData::System,
        }
    }

    #[must_use]
    pub fn new(lamports: u64, data: AccountData) -> Self {
        Self { lamports, data }
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self.data, AccountData::System)
    }

    #[must_use]
    pub fn as_token(&self) -> Option<&TokenAccount> {
        match &self.data {
            AccountData::Token(token) => Some(token),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_vault(&self) -> Option<&Vault> {
        match &self.data {
            AccountData::Vault(vault) => Some(vault),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_auction_house(&self) -> Option<&AuctionHouse> {
        match &self.data {
            AccountData::AuctionHouse(house) => Some(house),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_trade_state(&self) -> Option<&TradeState> {
        match &self.data {
            AccountData::TradeState(state) => Some(state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haus_types::OrderSide;

    #[test]
    fn sizes_follow_record_type() {
        assert!(AccountData::System.is_empty());
        assert_eq!(
            AccountData::TradeState(TradeState::new(255, OrderSide::Buy)).len(),
            constants::TRADE_STATE_SIZE
        );
        assert_eq!(
            AccountData::AuctionHouse(AuctionHouse::dummy(0)).len(),
            constants::AUCTION_HOUSE_SIZE
        );
    }

    #[test]
    fn typed_accessors() {
        let account = Account::new(
            10,
            AccountData::TradeState(TradeState::new(254, OrderSide::Sell)),
        );
        assert!(account.as_trade_state().is_some_and(TradeState::is_sell));
        assert!(account.as_vault().is_none());
        assert!(!account.is_system());
        assert!(Account::system(5).is_system());
    }

    #[test]
    fn serde_roundtrip() {
        let account = Account::new(
            42,
            AccountData::Token(TokenAccount::new(
                haus_types::Address([1u8; 32]),
                haus_types::Address([2u8; 32]),
            )),
        );
        let json = serde_json::to_string(&account).unwrap();
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(account, back);
    }
}
