//! The transition surface.
//!
//! Every instruction names all the accounts it touches and the bumps the
//! client derived for them. The engine re-derives and compares; it never
//! searches for a bump on the caller's behalf except when checking a
//! record it is about to create.

use haus_ledger::{Keypair, TransactionSignature};
use haus_types::{constants, Address, Result, TransactionId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAuctionHouse {
    /// Pays rent for the three new records.
    pub payer: Address,
    /// Initial authority; also the creator the house address derives from.
    pub authority: Address,
    pub currency_mint: Address,
    pub fee_withdrawal_destination: Address,
    pub treasury_withdrawal_destination: Address,
    pub treasury_withdrawal_destination_owner: Address,
    pub auction_house: Address,
    pub auction_house_bump: u8,
    pub fee_account: Address,
    pub fee_account_bump: u8,
    pub treasury: Address,
    pub treasury_bump: u8,
    pub seller_fee_basis_points: u16,
    pub requires_sign_off: bool,
    pub can_change_sale_price: bool,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAuctionHouse {
    /// The current authority.
    pub authority: Address,
    pub auction_house: Address,
    pub new_authority: Option<Address>,
    pub fee_withdrawal_destination: Option<Address>,
    pub treasury_withdrawal_destination: Option<Address>,
    pub treasury_withdrawal_destination_owner: Option<Address>,
    pub seller_fee_basis_points: Option<u16>,
    pub requires_sign_off: Option<bool>,
    pub can_change_sale_price: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub wallet: Address,
    /// Funding source: the wallet itself for native currency, otherwise a
    /// currency token account owned by the wallet.
    pub payment_account: Address,
    pub auction_house: Address,
    pub escrow_payment_account: Address,
    pub escrow_payment_bump: u8,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub wallet: Address,
    /// Destination: the wallet itself for native currency, otherwise a
    /// currency token account owned by the wallet.
    pub receipt_account: Address,
    /// House authority; may sign in place of the wallet.
    pub authority: Address,
    pub auction_house: Address,
    pub escrow_payment_account: Address,
    pub escrow_payment_bump: u8,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sell {
    pub wallet: Address,
    pub token_account: Address,
    pub token_mint: Address,
    pub auction_house: Address,
    pub seller_trade_state: Address,
    pub trade_state_bump: u8,
    pub free_seller_trade_state: Address,
    pub free_trade_state_bump: u8,
    pub program_as_signer: Address,
    pub program_as_signer_bump: u8,
    pub buyer_price: u64,
    pub token_size: u64,
}

/// A bid on one seller's asset account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buy {
    pub wallet: Address,
    pub token_account: Address,
    pub token_mint: Address,
    pub auction_house: Address,
    pub escrow_payment_account: Address,
    pub escrow_payment_bump: u8,
    pub buyer_trade_state: Address,
    pub trade_state_bump: u8,
    pub buyer_price: u64,
    pub token_size: u64,
}

/// A bid on a mint, whoever holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicBuy {
    pub wallet: Address,
    pub token_mint: Address,
    pub auction_house: Address,
    pub escrow_payment_account: Address,
    pub escrow_payment_bump: u8,
    pub buyer_trade_state: Address,
    pub trade_state_bump: u8,
    pub buyer_price: u64,
    pub token_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    /// Owner of the trade state.
    pub wallet: Address,
    /// House authority; may sign in place of the wallet.
    pub authority: Address,
    pub auction_house: Address,
    /// Asset account the order is bound to; `None` for a public bid.
    pub token_account: Option<Address>,
    pub token_mint: Address,
    pub trade_state: Address,
    pub trade_state_bump: u8,
    /// Zero-price companion, closed along with a listing.
    pub free_trade_state: Address,
    pub free_trade_state_bump: u8,
    /// Escrow whose commitment a cancelled bid releases.
    pub escrow_payment_account: Address,
    pub escrow_payment_bump: u8,
    /// Delegate revoked when a listing is cancelled.
    pub program_as_signer: Address,
    pub program_as_signer_bump: u8,
    pub buyer_price: u64,
    pub token_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteSale {
    pub buyer: Address,
    pub seller: Address,
    pub authority: Address,
    pub auction_house: Address,
    /// Seller's asset account.
    pub token_account: Address,
    pub token_mint: Address,
    pub buyer_receipt_token_account: Address,
    /// Seller wallet for native currency, otherwise the seller's currency
    /// token account.
    pub seller_payment_receipt_account: Address,
    pub escrow_payment_account: Address,
    pub escrow_payment_bump: u8,
    pub buyer_trade_state: Address,
    pub buyer_trade_state_bump: u8,
    /// Whether the bid is a public bid.
    pub public_bid: bool,
    pub seller_trade_state: Address,
    pub seller_trade_state_bump: u8,
    pub free_trade_state: Address,
    pub free_trade_state_bump: u8,
    pub fee_account: Address,
    pub treasury: Address,
    pub program_as_signer: Address,
    pub program_as_signer_bump: u8,
    pub buyer_price: u64,
    pub token_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFromFee {
    pub authority: Address,
    pub fee_withdrawal_destination: Address,
    pub auction_house: Address,
    pub fee_account: Address,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawFromTreasury {
    pub authority: Address,
    pub treasury_withdrawal_destination: Address,
    pub auction_house: Address,
    pub treasury: Address,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    CreateAuctionHouse(CreateAuctionHouse),
    UpdateAuctionHouse(UpdateAuctionHouse),
    Deposit(Deposit),
    Withdraw(Withdraw),
    Sell(Sell),
    Buy(Buy),
    PublicBuy(PublicBuy),
    Cancel(Cancel),
    ExecuteSale(ExecuteSale),
    WithdrawFromFee(WithdrawFromFee),
    WithdrawFromTreasury(WithdrawFromTreasury),
}

impl Instruction {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAuctionHouse(_) => "create_auction_house",
            Self::UpdateAuctionHouse(_) => "update_auction_house",
            Self::Deposit(_) => "deposit",
            Self::Withdraw(_) => "withdraw",
            Self::Sell(_) => "sell",
            Self::Buy(_) => "buy",
            Self::PublicBuy(_) => "public_buy",
            Self::Cancel(_) => "cancel",
            Self::ExecuteSale(_) => "execute_sale",
            Self::WithdrawFromFee(_) => "withdraw_from_fee",
            Self::WithdrawFromTreasury(_) => "withdraw_from_treasury",
        }
    }

    /// Every account this instruction may read or write.
    #[must_use]
    pub fn accounts(&self) -> Vec<Address> {
        match self {
            Self::CreateAuctionHouse(ix) => vec![
                ix.payer,
                ix.authority,
                ix.fee_withdrawal_destination,
                ix.treasury_withdrawal_destination,
                ix.treasury_withdrawal_destination_owner,
                ix.auction_house,
                ix.fee_account,
                ix.treasury,
            ],
            Self::UpdateAuctionHouse(ix) => {
                let mut accounts = vec![ix.authority, ix.auction_house];
                accounts.extend(ix.new_authority);
                accounts.extend(ix.fee_withdrawal_destination);
                accounts.extend(ix.treasury_withdrawal_destination);
                accounts.extend(ix.treasury_withdrawal_destination_owner);
                accounts
            }
            Self::Deposit(ix) => vec![
                ix.wallet,
                ix.payment_account,
                ix.auction_house,
                ix.escrow_payment_account,
            ],
            Self::Withdraw(ix) => vec![
                ix.wallet,
                ix.receipt_account,
                ix.authority,
                ix.auction_house,
                ix.escrow_payment_account,
            ],
            Self::Sell(ix) => vec![
                ix.wallet,
                ix.token_account,
                ix.auction_house,
                ix.seller_trade_state,
                ix.free_seller_trade_state,
                ix.program_as_signer,
            ],
            Self::Buy(ix) => vec![
                ix.wallet,
                ix.token_account,
                ix.auction_house,
                ix.escrow_payment_account,
                ix.buyer_trade_state,
            ],
            Self::PublicBuy(ix) => vec![
                ix.wallet,
                ix.auction_house,
                ix.escrow_payment_account,
                ix.buyer_trade_state,
            ],
            Self::Cancel(ix) => {
                let mut accounts = vec![
                    ix.wallet,
                    ix.authority,
                    ix.auction_house,
                    ix.trade_state,
                    ix.free_trade_state,
                    ix.escrow_payment_account,
                ];
                accounts.extend(ix.token_account);
                accounts
            }
            Self::ExecuteSale(ix) => vec![
                ix.buyer,
                ix.seller,
                ix.authority,
                ix.auction_house,
                ix.token_account,
                ix.buyer_receipt_token_account,
                ix.seller_payment_receipt_account,
                ix.escrow_payment_account,
                ix.buyer_trade_state,
                ix.seller_trade_state,
                ix.free_trade_state,
                ix.fee_account,
                ix.treasury,
                ix.program_as_signer,
            ],
            Self::WithdrawFromFee(ix) => vec![
                ix.authority,
                ix.fee_withdrawal_destination,
                ix.auction_house,
                ix.fee_account,
            ],
            Self::WithdrawFromTreasury(ix) => vec![
                ix.authority,
                ix.treasury_withdrawal_destination,
                ix.auction_house,
                ix.treasury,
            ],
        }
    }
}

/// An instruction plus the signatures authorizing it.
///
/// The signed message is `TRANSACTION_DOMAIN || nonce (LE) || json(instruction)`.
/// The nonce lets a party submit the same instruction twice on purpose.
/// Nonces should increase: once the replay window evicts a transaction,
/// nothing at or below its nonce is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub instruction: Instruction,
    pub nonce: u64,
    pub signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    pub fn message_for(instruction: &Instruction, nonce: u64) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(instruction)?;
        let mut message = Vec::with_capacity(constants::TRANSACTION_DOMAIN.len() + 8 + body.len());
        message.extend_from_slice(constants::TRANSACTION_DOMAIN);
        message.extend_from_slice(&nonce.to_le_bytes());
        message.extend_from_slice(&body);
        Ok(message)
    }

    /// Sign `instruction` with every keypair in `signers`.
    pub fn sign(instruction: Instruction, nonce: u64, signers: &[&Keypair]) -> Result<Self> {
        let message = Self::message_for(&instruction, nonce)?;
        let signatures = signers.iter().map(|k| k.sign(&message)).collect();
        Ok(Self {
            instruction,
            nonce,
            signatures,
        })
    }

    pub fn message(&self) -> Result<Vec<u8>> {
        Self::message_for(&self.instruction, self.nonce)
    }

    /// SHA-256 of the signed message.
    pub fn id(&self) -> Result<TransactionId> {
        Ok(TransactionId(Sha256::digest(self.message()?).into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haus_ledger::SignerSet;

    fn withdraw_fee(amount: u64) -> Instruction {
        Instruction::WithdrawFromFee(WithdrawFromFee {
            authority: Address([1u8; 32]),
            fee_withdrawal_destination: Address([2u8; 32]),
            auction_house: Address([3u8; 32]),
            fee_account: Address([4u8; 32]),
            amount,
        })
    }

    #[test]
    fn message_is_domain_separated() {
        let msg = SignedTransaction::message_for(&withdraw_fee(1), 7).unwrap();
        assert!(msg.starts_with(constants::TRANSACTION_DOMAIN));
        assert_eq!(
            &msg[constants::TRANSACTION_DOMAIN.len()..constants::TRANSACTION_DOMAIN.len() + 8],
            &7u64.to_le_bytes()
        );
    }

    #[test]
    fn signatures_cover_instruction() {
        let authority = Keypair::generate();
        let tx = SignedTransaction::sign(withdraw_fee(1), 0, &[&authority]).unwrap();
        let signers = SignerSet::verify(&tx.message().unwrap(), &tx.signatures).unwrap();
        assert!(signers.contains(&authority.address()));

        let mut tampered = tx.clone();
        tampered.instruction = withdraw_fee(1_000_000);
        assert!(SignerSet::verify(&tampered.message().unwrap(), &tampered.signatures).is_err());
    }

    #[test]
    fn nonce_changes_id() {
        let a = SignedTransaction::sign(withdraw_fee(1), 0, &[]).unwrap();
        let b = SignedTransaction::sign(withdraw_fee(1), 1, &[]).unwrap();
        assert_ne!(a.id().unwrap(), b.id().unwrap());
        assert_eq!(a.id().unwrap(), a.clone().id().unwrap());
    }

    #[test]
    fn accounts_cover_optional_fields() {
        let ix = Instruction::UpdateAuctionHouse(UpdateAuctionHouse {
            new_authority: Some(Address([9u8; 32])),
            ..UpdateAuctionHouse::default()
        });
        assert!(ix.accounts().contains(&Address([9u8; 32])));
        assert_eq!(ix.name(), "update_auction_house");
    }

    #[test]
    fn serde_roundtrip() {
        let tx = SignedTransaction::sign(withdraw_fee(5), 3, &[]).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        let back: SignedTransaction = serde_json::from_str(&json).unwrap();
        assert_eq!(tx, back);
    }
}
