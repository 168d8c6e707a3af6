//! Instruction builders.
//!
//! [`AuctionHouseClient`] derives every record address of one house once
//! and fills in the account lists and bumps the engine expects, so callers
//! only supply the wallets, asset accounts and order terms.

use haus_types::{Address, Result, TradeStateSeeds};

use crate::instruction::{
    Buy, Cancel, CreateAuctionHouse, Deposit, ExecuteSale, Instruction, PublicBuy, Sell,
    UpdateAuctionHouse, Withdraw, WithdrawFromFee, WithdrawFromTreasury,
};
use crate::pda::{
    find_auction_house_address, find_auction_house_fee_account_address,
    find_auction_house_treasury_address, find_escrow_payment_address,
    find_program_as_signer_address, find_trade_state_address,
};

/// Mint, total price and size of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTerms {
    pub token_mint: Address,
    pub price: u64,
    pub token_size: u64,
}

/// Settings chosen when a house is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseSettings {
    pub fee_withdrawal_destination: Address,
    pub treasury_withdrawal_destination: Address,
    pub treasury_withdrawal_destination_owner: Address,
    pub seller_fee_basis_points: u16,
    pub requires_sign_off: bool,
    pub can_change_sale_price: bool,
}

/// Both sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sale {
    pub buyer: Address,
    pub seller: Address,
    pub authority: Address,
    /// Seller's asset account.
    pub token_account: Address,
    pub buyer_receipt_token_account: Address,
    pub seller_payment_receipt_account: Address,
    /// Match against the buyer's public bid rather than a private one.
    pub public_bid: bool,
    pub terms: OrderTerms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionHouseClient {
    program_id: Address,
    creator: Address,
    currency_mint: Address,
    auction_house: (Address, u8),
    fee_account: (Address, u8),
    treasury: (Address, u8),
    program_as_signer: (Address, u8),
}

impl AuctionHouseClient {
    /// Derive the addresses of the house `creator` opens for `currency_mint`.
    pub fn new(program_id: Address, creator: Address, currency_mint: Address) -> Result<Self> {
        let auction_house = find_auction_house_address(&creator, &currency_mint, &program_id)?;
        let fee_account = find_auction_house_fee_account_address(&auction_house.0, &program_id)?;
        let treasury = find_auction_house_treasury_address(&auction_house.0, &program_id)?;
        let program_as_signer = find_program_as_signer_address(&program_id)?;
        Ok(Self {
            program_id,
            creator,
            currency_mint,
            auction_house,
            fee_account,
            treasury,
            program_as_signer,
        })
    }

    #[must_use]
    pub fn auction_house(&self) -> Address {
        self.auction_house.0
    }

    #[must_use]
    pub fn fee_account(&self) -> Address {
        self.fee_account.0
    }

    #[must_use]
    pub fn treasury(&self) -> Address {
        self.treasury.0
    }

    #[must_use]
    pub fn program_as_signer(&self) -> Address {
        self.program_as_signer.0
    }

    #[must_use]
    pub fn currency_mint(&self) -> Address {
        self.currency_mint
    }

    pub fn escrow(&self, wallet: &Address) -> Result<(Address, u8)> {
        find_escrow_payment_address(&self.auction_house.0, wallet, &self.program_id)
    }

    fn seeds(
        &self,
        wallet: Address,
        token_account: Option<Address>,
        terms: &OrderTerms,
    ) -> TradeStateSeeds {
        TradeStateSeeds {
            wallet,
            auction_house: self.auction_house.0,
            token_account,
            currency_mint: self.currency_mint,
            token_mint: terms.token_mint,
            price: terms.price,
            token_size: terms.token_size,
        }
    }

    /// Trade state of an order; `token_account` is `None` for a public bid.
    pub fn trade_state(
        &self,
        wallet: Address,
        token_account: Option<Address>,
        terms: &OrderTerms,
    ) -> Result<(Address, u8)> {
        find_trade_state_address(&self.seeds(wallet, token_account, terms), &self.program_id)
    }

    /// Zero-price companion of a listing.
    pub fn free_trade_state(
        &self,
        wallet: Address,
        token_account: Address,
        terms: &OrderTerms,
    ) -> Result<(Address, u8)> {
        find_trade_state_address(
            &self.seeds(wallet, Some(token_account), terms).free(),
            &self.program_id,
        )
    }

    /// The creator becomes the initial authority.
    #[must_use]
    pub fn create(&self, payer: Address, settings: &HouseSettings) -> Instruction {
        Instruction::CreateAuctionHouse(CreateAuctionHouse {
            payer,
            authority: self.creator,
            currency_mint: self.currency_mint,
            fee_withdrawal_destination: settings.fee_withdrawal_destination,
            treasury_withdrawal_destination: settings.treasury_withdrawal_destination,
            treasury_withdrawal_destination_owner: settings.treasury_withdrawal_destination_owner,
            auction_house: self.auction_house.0,
            auction_house_bump: self.auction_house.1,
            fee_account: self.fee_account.0,
            fee_account_bump: self.fee_account.1,
            treasury: self.treasury.0,
            treasury_bump: self.treasury.1,
            seller_fee_basis_points: settings.seller_fee_basis_points,
            requires_sign_off: settings.requires_sign_off,
            can_change_sale_price: settings.can_change_sale_price,
        })
    }

    /// `changes` carries only the fields to update.
    #[must_use]
    pub fn update(&self, authority: Address, changes: UpdateAuctionHouse) -> Instruction {
        Instruction::UpdateAuctionHouse(UpdateAuctionHouse {
            authority,
            auction_house: self.auction_house.0,
            ..changes
        })
    }

    pub fn deposit(
        &self,
        wallet: Address,
        payment_account: Address,
        amount: u64,
    ) -> Result<Instruction> {
        let (escrow_payment_account, escrow_payment_bump) = self.escrow(&wallet)?;
        Ok(Instruction::Deposit(Deposit {
            wallet,
            payment_account,
            auction_house: self.auction_house.0,
            escrow_payment_account,
            escrow_payment_bump,
            amount,
        }))
    }

    pub fn withdraw(
        &self,
        wallet: Address,
        receipt_account: Address,
        authority: Address,
        amount: u64,
    ) -> Result<Instruction> {
        let (escrow_payment_account, escrow_payment_bump) = self.escrow(&wallet)?;
        Ok(Instruction::Withdraw(Withdraw {
            wallet,
            receipt_account,
            authority,
            auction_house: self.auction_house.0,
            escrow_payment_account,
            escrow_payment_bump,
            amount,
        }))
    }

    pub fn sell(
        &self,
        wallet: Address,
        token_account: Address,
        terms: &OrderTerms,
    ) -> Result<Instruction> {
        let (seller_trade_state, trade_state_bump) =
            self.trade_state(wallet, Some(token_account), terms)?;
        let (free_seller_trade_state, free_trade_state_bump) =
            self.free_trade_state(wallet, token_account, terms)?;
        Ok(Instruction::Sell(Sell {
            wallet,
            token_account,
            token_mint: terms.token_mint,
            auction_house: self.auction_house.0,
            seller_trade_state,
            trade_state_bump,
            free_seller_trade_state,
            free_trade_state_bump,
            program_as_signer: self.program_as_signer.0,
            program_as_signer_bump: self.program_as_signer.1,
            buyer_price: terms.price,
            token_size: terms.token_size,
        }))
    }

    pub fn buy(
        &self,
        wallet: Address,
        token_account: Address,
        terms: &OrderTerms,
    ) -> Result<Instruction> {
        let (escrow_payment_account, escrow_payment_bump) = self.escrow(&wallet)?;
        let (buyer_trade_state, trade_state_bump) =
            self.trade_state(wallet, Some(token_account), terms)?;
        Ok(Instruction::Buy(Buy {
            wallet,
            token_account,
            token_mint: terms.token_mint,
            auction_house: self.auction_house.0,
            escrow_payment_account,
            escrow_payment_bump,
            buyer_trade_state,
            trade_state_bump,
            buyer_price: terms.price,
            token_size: terms.token_size,
        }))
    }

    pub fn public_buy(&self, wallet: Address, terms: &OrderTerms) -> Result<Instruction> {
        let (escrow_payment_account, escrow_payment_bump) = self.escrow(&wallet)?;
        let (buyer_trade_state, trade_state_bump) = self.trade_state(wallet, None, terms)?;
        Ok(Instruction::PublicBuy(PublicBuy {
            wallet,
            token_mint: terms.token_mint,
            auction_house: self.auction_house.0,
            escrow_payment_account,
            escrow_payment_bump,
            buyer_trade_state,
            trade_state_bump,
            buyer_price: terms.price,
            token_size: terms.token_size,
        }))
    }

    fn cancel(
        &self,
        wallet: Address,
        authority: Address,
        token_account: Option<Address>,
        terms: &OrderTerms,
    ) -> Result<Instruction> {
        let (trade_state, trade_state_bump) = self.trade_state(wallet, token_account, terms)?;
        let (free_trade_state, free_trade_state_bump) = find_trade_state_address(
            &self.seeds(wallet, token_account, terms).free(),
            &self.program_id,
        )?;
        let (escrow_payment_account, escrow_payment_bump) = self.escrow(&wallet)?;
        Ok(Instruction::Cancel(Cancel {
            wallet,
            authority,
            auction_house: self.auction_house.0,
            token_account,
            token_mint: terms.token_mint,
            trade_state,
            trade_state_bump,
            free_trade_state,
            free_trade_state_bump,
            escrow_payment_account,
            escrow_payment_bump,
            program_as_signer: self.program_as_signer.0,
            program_as_signer_bump: self.program_as_signer.1,
            buyer_price: terms.price,
            token_size: terms.token_size,
        }))
    }

    pub fn cancel_listing(
        &self,
        wallet: Address,
        authority: Address,
        token_account: Address,
        terms: &OrderTerms,
    ) -> Result<Instruction> {
        self.cancel(wallet, authority, Some(token_account), terms)
    }

    /// `token_account` is `None` to cancel a public bid.
    pub fn cancel_bid(
        &self,
        wallet: Address,
        authority: Address,
        token_account: Option<Address>,
        terms: &OrderTerms,
    ) -> Result<Instruction> {
        self.cancel(wallet, authority, token_account, terms)
    }

    pub fn execute_sale(&self, sale: &Sale) -> Result<Instruction> {
        let (escrow_payment_account, escrow_payment_bump) = self.escrow(&sale.buyer)?;
        let bid_account = (!sale.public_bid).then_some(sale.token_account);
        let (buyer_trade_state, buyer_trade_state_bump) =
            self.trade_state(sale.buyer, bid_account, &sale.terms)?;
        let (seller_trade_state, seller_trade_state_bump) =
            self.trade_state(sale.seller, Some(sale.token_account), &sale.terms)?;
        let (free_trade_state, free_trade_state_bump) =
            self.free_trade_state(sale.seller, sale.token_account, &sale.terms)?;
        Ok(Instruction::ExecuteSale(ExecuteSale {
            buyer: sale.buyer,
            seller: sale.seller,
            authority: sale.authority,
            auction_house: self.auction_house.0,
            token_account: sale.token_account,
            token_mint: sale.terms.token_mint,
            buyer_receipt_token_account: sale.buyer_receipt_token_account,
            seller_payment_receipt_account: sale.seller_payment_receipt_account,
            escrow_payment_account,
            escrow_payment_bump,
            buyer_trade_state,
            buyer_trade_state_bump,
            public_bid: sale.public_bid,
            seller_trade_state,
            seller_trade_state_bump,
            free_trade_state,
            free_trade_state_bump,
            fee_account: self.fee_account.0,
            treasury: self.treasury.0,
            program_as_signer: self.program_as_signer.0,
            program_as_signer_bump: self.program_as_signer.1,
            buyer_price: sale.terms.price,
            token_size: sale.terms.token_size,
        }))
    }

    #[must_use]
    pub fn withdraw_from_fee(
        &self,
        authority: Address,
        fee_withdrawal_destination: Address,
        amount: u64,
    ) -> Instruction {
        Instruction::WithdrawFromFee(WithdrawFromFee {
            authority,
            fee_withdrawal_destination,
            auction_house: self.auction_house.0,
            fee_account: self.fee_account.0,
            amount,
        })
    }

    #[must_use]
    pub fn withdraw_from_treasury(
        &self,
        authority: Address,
        treasury_withdrawal_destination: Address,
        amount: u64,
    ) -> Instruction {
        Instruction::WithdrawFromTreasury(WithdrawFromTreasury {
            authority,
            treasury_withdrawal_destination,
            auction_house: self.auction_house.0,
            treasury: self.treasury.0,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haus_types::constants::{DEFAULT_PROGRAM_ID, NATIVE_MINT};

    fn client() -> AuctionHouseClient {
        AuctionHouseClient::new(DEFAULT_PROGRAM_ID, Address([1u8; 32]), NATIVE_MINT).unwrap()
    }

    fn terms(price: u64) -> OrderTerms {
        OrderTerms {
            token_mint: Address([7u8; 32]),
            price,
            token_size: 1,
        }
    }

    #[test]
    fn sell_derives_both_trade_states() {
        let client = client();
        let seller = Address([2u8; 32]);
        let token_account = Address([3u8; 32]);
        let Instruction::Sell(ix) = client.sell(seller, token_account, &terms(10)).unwrap() else {
            panic!("expected a sell instruction");
        };
        assert_eq!(
            client
                .trade_state(seller, Some(token_account), &terms(10))
                .unwrap(),
            (ix.seller_trade_state, ix.trade_state_bump)
        );
        assert_eq!(
            client.trade_state(seller, Some(token_account), &terms(0)).unwrap().0,
            ix.free_seller_trade_state
        );
        assert_eq!(ix.program_as_signer, client.program_as_signer());
    }

    #[test]
    fn public_and_private_bids_differ() {
        let client = client();
        let buyer = Address([4u8; 32]);
        let private = client
            .trade_state(buyer, Some(Address([3u8; 32])), &terms(10))
            .unwrap();
        let public = client.trade_state(buyer, None, &terms(10)).unwrap();
        assert_ne!(private.0, public.0);
    }

    #[test]
    fn execute_sale_links_matching_orders() {
        let client = client();
        let sale = Sale {
            buyer: Address([4u8; 32]),
            seller: Address([2u8; 32]),
            authority: Address([1u8; 32]),
            token_account: Address([3u8; 32]),
            buyer_receipt_token_account: Address([5u8; 32]),
            seller_payment_receipt_account: Address([2u8; 32]),
            public_bid: true,
            terms: terms(10),
        };
        let Instruction::ExecuteSale(ix) = client.execute_sale(&sale).unwrap() else {
            panic!("expected an execute-sale instruction");
        };
        let Instruction::PublicBuy(bid) = client.public_buy(sale.buyer, &sale.terms).unwrap()
        else {
            panic!("expected a public bid");
        };
        assert_eq!(ix.buyer_trade_state, bid.buyer_trade_state);
        assert_eq!(ix.escrow_payment_account, bid.escrow_payment_account);
        assert_eq!(ix.fee_account, client.fee_account());
    }

    #[test]
    fn update_pins_house_and_authority() {
        let client = client();
        let ix = client.update(
            Address([9u8; 32]),
            UpdateAuctionHouse {
                auction_house: Address([0xAA; 32]),
                seller_fee_basis_points: Some(250),
                ..UpdateAuctionHouse::default()
            },
        );
        let Instruction::UpdateAuctionHouse(ix) = ix else {
            panic!("expected an update");
        };
        assert_eq!(ix.auction_house, client.auction_house());
        assert_eq!(ix.authority, Address([9u8; 32]));
        assert_eq!(ix.seller_fee_basis_points, Some(250));
    }
}
