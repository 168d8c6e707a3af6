//! execute-sale: the atomic swap of asset for escrowed currency.
//!
//! Preconditions, all checked before anything moves:
//! 1. a live bid at `(buyer, price, size)`, private or public
//! 2. a live listing at `(seller, price, size)`, or the seller's free
//!    listing when the house allows re-pricing and the authority or the
//!    seller co-signs
//! 3. the authority's co-signature when the house requires sign-off
//! 4. an escrow holding at least `price`
//!
//! Effects: fee to the fee account, remainder to the seller, asset to the
//! buyer under the program signer, matched trade states closed, drained
//! escrow closed.

use haus_types::{
    seeds, verify_program_address, Address, HausError, OrderSide, ReceiptBody, ReceiptKind,
    Result, TradeStateSeeds,
};

use super::{
    assert_currency_account, assert_keys_equal, load_house, pay_from_vault,
    transfer_between_vaults, vault_balance, Context,
};
use crate::instruction::ExecuteSale;
use crate::program_signer::ProgramSigner;

const ESCROW: &str = "escrow_payment_account";
const FEE_ACCOUNT: &str = "auction_house_fee_account";

/// The record at `address` must be a live trade state posted by `side`.
fn expect_side(
    ctx: &Context<'_, '_>,
    account: &'static str,
    address: &Address,
    side: OrderSide,
) -> Result<()> {
    if ctx.uow.trade_state(account, address)?.side != side {
        return Err(HausError::WrongAccountType {
            address: *address,
            expected: account,
        });
    }
    Ok(())
}

fn verify_trade_state(
    ctx: &Context<'_, '_>,
    account: &'static str,
    trade_state: &TradeStateSeeds,
    bump: u8,
    address: &Address,
) -> Result<()> {
    trade_state.with_seeds(|s| verify_program_address(account, s, bump, ctx.program_id, address))
}

/// Seller asset account: owned by the seller, holding `size` of the mint,
/// delegated to the program signer. Buyer receipt account: owned by the
/// buyer, same mint, no delegate.
fn check_asset_accounts(
    ctx: &Context<'_, '_>,
    ix: &ExecuteSale,
    program_signer: &Address,
) -> Result<()> {
    if ctx.metadata.metadata(&ix.token_mint).is_none() {
        return Err(HausError::MetadataNotFound(ix.token_mint));
    }

    let seller_token = ctx.uow.token_account("token_account", &ix.token_account)?;
    assert_keys_equal("token_account owner", &ix.seller, &seller_token.owner)?;
    if seller_token.mint != ix.token_mint {
        return Err(HausError::InvalidTokenAccount {
            address: ix.token_account,
            reason: "does not hold the traded mint".into(),
        });
    }
    if seller_token.amount < ix.token_size {
        return Err(HausError::InvalidTokenAmount {
            needed: ix.token_size,
            held: seller_token.amount,
        });
    }
    if !seller_token.is_delegated_to(program_signer, ix.token_size) {
        return Err(HausError::InvalidTokenAccount {
            address: ix.token_account,
            reason: "not delegated to the program signer".into(),
        });
    }

    let receipt = ctx
        .uow
        .token_account("buyer_receipt_token_account", &ix.buyer_receipt_token_account)?;
    assert_keys_equal(
        "buyer_receipt_token_account owner",
        &ix.buyer,
        &receipt.owner,
    )?;
    if receipt.mint != ix.token_mint {
        return Err(HausError::InvalidTokenAccount {
            address: ix.buyer_receipt_token_account,
            reason: "does not hold the traded mint".into(),
        });
    }
    if receipt.delegate.is_some() {
        return Err(HausError::InvalidTokenAccount {
            address: ix.buyer_receipt_token_account,
            reason: "receipt account must not carry a delegate".into(),
        });
    }
    Ok(())
}

pub(super) fn execute_sale(ctx: &mut Context<'_, '_>, ix: &ExecuteSale) -> Result<ReceiptBody> {
    let house = load_house(ctx, &ix.auction_house)?;
    assert_keys_equal("authority", &house.authority, &ix.authority)?;
    if house.requires_sign_off && !ctx.signers.contains(&house.authority) {
        return Err(HausError::MissingSignOff);
    }
    assert_keys_equal(FEE_ACCOUNT, &house.fee_account, &ix.fee_account)?;
    assert_keys_equal("auction_house_treasury", &house.treasury, &ix.treasury)?;
    verify_program_address(
        ESCROW,
        &seeds::escrow(&ix.auction_house, &ix.buyer),
        ix.escrow_payment_bump,
        ctx.program_id,
        &ix.escrow_payment_account,
    )?;
    let program_signer = ProgramSigner::verify(
        ctx.program_id,
        ix.program_as_signer,
        ix.program_as_signer_bump,
    )?;

    // Buyer side.
    let bid = TradeStateSeeds {
        wallet: ix.buyer,
        auction_house: ix.auction_house,
        token_account: (!ix.public_bid).then_some(ix.token_account),
        currency_mint: house.currency_mint,
        token_mint: ix.token_mint,
        price: ix.buyer_price,
        token_size: ix.token_size,
    };
    verify_trade_state(
        ctx,
        "buyer_trade_state",
        &bid,
        ix.buyer_trade_state_bump,
        &ix.buyer_trade_state,
    )?;
    expect_side(ctx, "buyer_trade_state", &ix.buyer_trade_state, OrderSide::Buy)?;

    // Seller side.
    let listing = TradeStateSeeds {
        wallet: ix.seller,
        token_account: Some(ix.token_account),
        ..bid
    };
    verify_trade_state(
        ctx,
        "seller_trade_state",
        &listing,
        ix.seller_trade_state_bump,
        &ix.seller_trade_state,
    )?;
    verify_trade_state(
        ctx,
        "free_trade_state",
        &listing.free(),
        ix.free_trade_state_bump,
        &ix.free_trade_state,
    )?;

    let co_signed =
        ctx.signers.contains(&house.authority) || ctx.signers.contains(&ix.seller);
    let listed = ctx.uow.exists(&ix.seller_trade_state)?;
    let free_listed = ctx.uow.exists(&ix.free_trade_state)?;
    if listed {
        expect_side(ctx, "seller_trade_state", &ix.seller_trade_state, OrderSide::Sell)?;
    } else {
        if !(free_listed && house.can_change_sale_price) {
            return Err(HausError::NotFound {
                account: "seller_trade_state",
                address: ix.seller_trade_state,
            });
        }
        if !co_signed {
            return Err(HausError::FreeSaleRequiresSignOff);
        }
        expect_side(ctx, "free_trade_state", &ix.free_trade_state, OrderSide::Sell)?;
    }
    if ix.buyer_price == 0 && !co_signed {
        return Err(HausError::FreeSaleRequiresSignOff);
    }

    check_asset_accounts(ctx, ix, &program_signer.address())?;

    // Funds.
    let escrow_exists = ctx.uow.exists(&ix.escrow_payment_account)?;
    if ix.buyer_price > 0 {
        if !escrow_exists {
            return Err(HausError::NotFound {
                account: ESCROW,
                address: ix.escrow_payment_account,
            });
        }
        let available = vault_balance(ctx.uow, ESCROW, &ix.escrow_payment_account)?;
        if available < ix.buyer_price {
            return Err(HausError::InsufficientFunds {
                needed: ix.buyer_price,
                available,
            });
        }
    }
    if house.is_native() {
        assert_keys_equal(
            "seller_payment_receipt_account",
            &ix.seller,
            &ix.seller_payment_receipt_account,
        )?;
    } else {
        assert_currency_account(
            ctx.uow,
            "seller_payment_receipt_account",
            &ix.seller_payment_receipt_account,
            &house.currency_mint,
            Some(&ix.seller),
        )?;
    }

    let fee = house.marketplace_fee(ix.buyer_price)?;
    let proceeds = ix
        .buyer_price
        .checked_sub(fee)
        .ok_or(HausError::NumericalOverflow)?;
    if escrow_exists {
        ctx.uow
            .vault_mut(ESCROW, &ix.escrow_payment_account)?
            .release(ix.buyer_price)?;
        transfer_between_vaults(
            ctx.uow,
            (ESCROW, &ix.escrow_payment_account),
            (FEE_ACCOUNT, &ix.fee_account),
            fee,
        )?;
        pay_from_vault(
            ctx.uow,
            ESCROW,
            &ix.escrow_payment_account,
            &ix.seller_payment_receipt_account,
            proceeds,
        )?;
    }

    // Asset, moved by the program signer under the seller's delegation.
    let signer = program_signer.authorize(ctx.signers, ctx.program_id)?;
    ctx.uow.transfer_tokens(
        &ix.token_account,
        &ix.buyer_receipt_token_account,
        &signer,
        ix.token_size,
    )?;

    // Consume the orders.
    ctx.uow
        .close("buyer_trade_state", &ix.buyer_trade_state, &ix.buyer)?;
    if listed {
        ctx.uow
            .close("seller_trade_state", &ix.seller_trade_state, &ix.seller)?;
    }
    if free_listed && ix.free_trade_state != ix.seller_trade_state {
        ctx.uow
            .close("free_trade_state", &ix.free_trade_state, &ix.seller)?;
    }

    if escrow_exists {
        let remaining = vault_balance(ctx.uow, ESCROW, &ix.escrow_payment_account)?;
        let committed = ctx.uow.vault(ESCROW, &ix.escrow_payment_account)?.committed;
        if remaining == 0 && committed == 0 {
            ctx.uow
                .close(ESCROW, &ix.escrow_payment_account, &ix.buyer)?;
        }
    }

    let matched = if listed {
        ix.seller_trade_state
    } else {
        ix.free_trade_state
    };
    tracing::debug!(
        buyer = %ix.buyer.short(),
        seller = %ix.seller.short(),
        price = ix.buyer_price,
        fee,
        proceeds,
        free_path = !listed,
        "Sale settled"
    );

    let mut body = ReceiptBody::new(ReceiptKind::Purchase, ix.auction_house, ix.buyer).with_order(
        matched,
        ix.token_mint,
        ix.buyer_price,
        ix.token_size,
    );
    body.counterparty = Some(ix.seller);
    body.fee = fee;
    Ok(body)
}
