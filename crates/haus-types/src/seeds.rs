//! Seed tuples for every derived record.
//!
//! Each record's address is a pure function of the tuple built here, so
//! clients, the engine and tests all share one definition.

use crate::{constants, Address};

/// `[PREFIX, creator, currency_mint]`
#[must_use]
pub fn auction_house<'a>(creator: &'a Address, currency_mint: &'a Address) -> [&'a [u8]; 3] {
    [constants::PREFIX, creator.as_ref(), currency_mint.as_ref()]
}

/// `[PREFIX, auction_house, FEE_PAYER]`
#[must_use]
pub fn fee_account(auction_house: &Address) -> [&[u8]; 3] {
    [constants::PREFIX, auction_house.as_ref(), constants::FEE_PAYER]
}

/// `[PREFIX, auction_house, TREASURY]`
#[must_use]
pub fn treasury(auction_house: &Address) -> [&[u8]; 3] {
    [constants::PREFIX, auction_house.as_ref(), constants::TREASURY]
}

/// `[PREFIX, auction_house, wallet]`
#[must_use]
pub fn escrow<'a>(auction_house: &'a Address, wallet: &'a Address) -> [&'a [u8]; 3] {
    [constants::PREFIX, auction_house.as_ref(), wallet.as_ref()]
}

/// `[PREFIX, SIGNER]`
#[must_use]
pub fn program_signer() -> [&'static [u8]; 2] {
    [constants::PREFIX, constants::SIGNER]
}

/// The tuple identifying one order.
///
/// `token_account` is `None` for public bids, which are not bound to a
/// particular seller's asset account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeStateSeeds {
    pub wallet: Address,
    pub auction_house: Address,
    pub token_account: Option<Address>,
    pub currency_mint: Address,
    pub token_mint: Address,
    pub price: u64,
    pub token_size: u64,
}

impl TradeStateSeeds {
    /// The zero-price companion of this tuple.
    #[must_use]
    pub fn free(&self) -> Self {
        Self { price: 0, ..*self }
    }

    /// Run `f` with the seed slices of this tuple.
    pub fn with_seeds<R>(&self, f: impl FnOnce(&[&[u8]]) -> R) -> R {
        let price = self.price.to_le_bytes();
        let size = self.token_size.to_le_bytes();
        match &self.token_account {
            Some(token_account) => f(&[
                constants::PREFIX,
                self.wallet.as_ref(),
                self.auction_house.as_ref(),
                token_account.as_ref(),
                self.currency_mint.as_ref(),
                self.token_mint.as_ref(),
                &price,
                &size,
            ]),
            None => f(&[
                constants::PREFIX,
                self.wallet.as_ref(),
                self.auction_house.as_ref(),
                self.currency_mint.as_ref(),
                self.token_mint.as_ref(),
                &price,
                &size,
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivation::find_program_address;

    fn tuple() -> TradeStateSeeds {
        TradeStateSeeds {
            wallet: Address([1u8; 32]),
            auction_house: Address([2u8; 32]),
            token_account: Some(Address([3u8; 32])),
            currency_mint: constants::NATIVE_MINT,
            token_mint: Address([4u8; 32]),
            price: 1_000,
            token_size: 1,
        }
    }

    fn derive(seeds: &TradeStateSeeds) -> Address {
        seeds
            .with_seeds(|s| find_program_address(s, &constants::DEFAULT_PROGRAM_ID))
            .unwrap()
            .0
    }

    #[test]
    fn identical_tuples_collapse() {
        assert_eq!(derive(&tuple()), derive(&tuple()));
    }

    #[test]
    fn every_component_matters() {
        let base = derive(&tuple());
        assert_ne!(base, derive(&TradeStateSeeds { price: 1_001, ..tuple() }));
        assert_ne!(base, derive(&TradeStateSeeds { token_size: 2, ..tuple() }));
        assert_ne!(base, derive(&TradeStateSeeds { wallet: Address([9u8; 32]), ..tuple() }));
        assert_ne!(base, derive(&TradeStateSeeds { token_account: None, ..tuple() }));
    }

    #[test]
    fn free_companion_zeroes_price() {
        let free = tuple().free();
        assert_eq!(free.price, 0);
        assert_eq!(free.token_size, 1);
        assert_ne!(derive(&free), derive(&tuple()));
    }

    #[test]
    fn record_seeds_are_distinct() {
        let house = Address([7u8; 32]);
        let program = constants::DEFAULT_PROGRAM_ID;
        let (fee, _) = find_program_address(&fee_account(&house), &program).unwrap();
        let (treasury, _) = find_program_address(&treasury(&house), &program).unwrap();
        let (escrow, _) =
            find_program_address(&escrow(&house, &Address([8u8; 32])), &program).unwrap();
        assert_ne!(fee, treasury);
        assert_ne!(fee, escrow);
        assert_ne!(treasury, escrow);
    }
}
