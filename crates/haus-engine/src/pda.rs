//! Client-side address helpers: one `find_*` per derived record.

use haus_types::{find_program_address, seeds, Address, Result, TradeStateSeeds};

pub fn find_auction_house_address(
    creator: &Address,
    currency_mint: &Address,
    program_id: &Address,
) -> Result<(Address, u8)> {
    find_program_address(&seeds::auction_house(creator, currency_mint), program_id)
}

pub fn find_auction_house_fee_account_address(
    auction_house: &Address,
    program_id: &Address,
) -> Result<(Address, u8)> {
    find_program_address(&seeds::fee_account(auction_house), program_id)
}

pub fn find_auction_house_treasury_address(
    auction_house: &Address,
    program_id: &Address,
) -> Result<(Address, u8)> {
    find_program_address(&seeds::treasury(auction_house), program_id)
}

pub fn find_escrow_payment_address(
    auction_house: &Address,
    wallet: &Address,
    program_id: &Address,
) -> Result<(Address, u8)> {
    find_program_address(&seeds::escrow(auction_house, wallet), program_id)
}

pub fn find_program_as_signer_address(program_id: &Address) -> Result<(Address, u8)> {
    find_program_address(&seeds::program_signer(), program_id)
}

pub fn find_trade_state_address(
    trade_state: &TradeStateSeeds,
    program_id: &Address,
) -> Result<(Address, u8)> {
    trade_state.with_seeds(|s| find_program_address(s, program_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use haus_types::constants::{DEFAULT_PROGRAM_ID, NATIVE_MINT};

    #[test]
    fn house_address_depends_on_creator_and_mint() {
        let a = find_auction_house_address(&Address([1u8; 32]), &NATIVE_MINT, &DEFAULT_PROGRAM_ID)
            .unwrap();
        let b = find_auction_house_address(&Address([2u8; 32]), &NATIVE_MINT, &DEFAULT_PROGRAM_ID)
            .unwrap();
        let c = find_auction_house_address(
            &Address([1u8; 32]),
            &Address([5u8; 32]),
            &DEFAULT_PROGRAM_ID,
        )
        .unwrap();
        assert_ne!(a.0, b.0);
        assert_ne!(a.0, c.0);
    }

    #[test]
    fn public_and_private_bids_differ() {
        let private = TradeStateSeeds {
            wallet: Address([1u8; 32]),
            auction_house: Address([2u8; 32]),
            token_account: Some(Address([3u8; 32])),
            currency_mint: NATIVE_MINT,
            token_mint: Address([4u8; 32]),
            price: 10,
            token_size: 1,
        };
        let public = TradeStateSeeds {
            token_account: None,
            ..private
        };
        let (a, _) = find_trade_state_address(&private, &DEFAULT_PROGRAM_ID).unwrap();
        let (b, _) = find_trade_state_address(&public, &DEFAULT_PROGRAM_ID).unwrap();
        assert_ne!(a, b);
    }
}
