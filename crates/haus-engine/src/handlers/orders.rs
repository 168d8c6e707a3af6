//! Listings, bids and their cancellation.
//!
//! ```text
//!   sell(P)  ──▶ trade state @P  (+ free trade state @0 when P ≠ 0)
//!                asset delegated to the program signer for `token_size`
//!   buy(P)   ──▶ trade state @P, escrow commits P
//!   cancel   ──▶ trade state closed; listing: delegation revoked and free
//!                companion closed; bid: escrow commitment released
//! ```

use haus_ledger::AccountData;
use haus_types::{
    seeds, verify_canonical_address, verify_program_address, Address, HausError, OrderSide,
    ReceiptBody, ReceiptKind, Result, TradeState, TradeStateSeeds,
};

use super::{assert_keys_equal, load_house, require_wallet_or_authority, vault_balance, Context};
use crate::instruction::{Buy, Cancel, PublicBuy, Sell};
use crate::program_signer::ProgramSigner;

const ESCROW: &str = "escrow_payment_account";

/// Verify a trade state about to be created and refuse to overwrite.
fn check_new_trade_state(
    ctx: &Context<'_, '_>,
    account: &'static str,
    trade_state: &TradeStateSeeds,
    bump: u8,
    address: &Address,
) -> Result<()> {
    trade_state
        .with_seeds(|s| verify_canonical_address(account, s, bump, ctx.program_id, address))?;
    if ctx
        .uow
        .get(address)?
        .is_some_and(|a| a.as_trade_state().is_some())
    {
        return Err(HausError::DuplicateRecord {
            account,
            address: *address,
        });
    }
    Ok(())
}

/// The asset must have a metadata descriptor and the token account must
/// hold `token_size` of it.
fn check_listed_asset(
    ctx: &Context<'_, '_>,
    token_account: &Address,
    token_mint: &Address,
    token_size: u64,
    owner: Option<&Address>,
) -> Result<()> {
    if ctx.metadata.metadata(token_mint).is_none() {
        return Err(HausError::MetadataNotFound(*token_mint));
    }
    let token = ctx.uow.token_account("token_account", token_account)?;
    if token.mint != *token_mint {
        return Err(HausError::InvalidTokenAccount {
            address: *token_account,
            reason: format!("holds mint {}, not {}", token.mint.short(), token_mint.short()),
        });
    }
    if let Some(owner) = owner {
        assert_keys_equal("token_account owner", owner, &token.owner)?;
    }
    if token.amount < token_size {
        return Err(HausError::InvalidTokenAmount {
            needed: token_size,
            held: token.amount,
        });
    }
    Ok(())
}

pub(super) fn sell(ctx: &mut Context<'_, '_>, ix: &Sell) -> Result<ReceiptBody> {
    ctx.signers.require(&ix.wallet, "wallet")?;
    let house = load_house(ctx, &ix.auction_house)?;
    check_listed_asset(
        ctx,
        &ix.token_account,
        &ix.token_mint,
        ix.token_size,
        Some(&ix.wallet),
    )?;
    let program_signer = ProgramSigner::verify_canonical(
        ctx.program_id,
        ix.program_as_signer,
        ix.program_as_signer_bump,
    )?;

    let listing = TradeStateSeeds {
        wallet: ix.wallet,
        auction_house: ix.auction_house,
        token_account: Some(ix.token_account),
        currency_mint: house.currency_mint,
        token_mint: ix.token_mint,
        price: ix.buyer_price,
        token_size: ix.token_size,
    };
    check_new_trade_state(
        ctx,
        "seller_trade_state",
        &listing,
        ix.trade_state_bump,
        &ix.seller_trade_state,
    )?;
    if ix.buyer_price != 0 {
        check_new_trade_state(
            ctx,
            "free_seller_trade_state",
            &listing.free(),
            ix.free_trade_state_bump,
            &ix.free_seller_trade_state,
        )?;
    }

    ctx.uow.create(
        "seller_trade_state",
        &ix.seller_trade_state,
        &ix.wallet,
        AccountData::TradeState(TradeState::new(ix.trade_state_bump, OrderSide::Sell)),
    )?;
    if ix.buyer_price != 0 {
        ctx.uow.create(
            "free_seller_trade_state",
            &ix.free_seller_trade_state,
            &ix.wallet,
            AccountData::TradeState(TradeState::new(ix.free_trade_state_bump, OrderSide::Sell)),
        )?;
    }

    ctx.uow
        .token_account_mut("token_account", &ix.token_account)?
        .approve(
            ix.token_account,
            &ix.wallet,
            program_signer.address(),
            ix.token_size,
        )?;

    tracing::debug!(
        seller = %ix.wallet.short(),
        trade_state = %ix.seller_trade_state.short(),
        price = ix.buyer_price,
        size = ix.token_size,
        "Listing posted"
    );
    Ok(
        ReceiptBody::new(ReceiptKind::Listing, ix.auction_house, ix.wallet).with_order(
            ix.seller_trade_state,
            ix.token_mint,
            ix.buyer_price,
            ix.token_size,
        ),
    )
}

/// Shared body of private and public bids.
struct Bid<'a> {
    wallet: &'a Address,
    token_account: Option<&'a Address>,
    token_mint: &'a Address,
    auction_house: &'a Address,
    escrow_payment_account: &'a Address,
    escrow_payment_bump: u8,
    buyer_trade_state: &'a Address,
    trade_state_bump: u8,
    buyer_price: u64,
    token_size: u64,
}

fn bid(ctx: &mut Context<'_, '_>, bid: &Bid<'_>) -> Result<ReceiptBody> {
    ctx.signers.require(bid.wallet, "wallet")?;
    let house = load_house(ctx, bid.auction_house)?;

    match bid.token_account {
        Some(token_account) => {
            check_listed_asset(ctx, token_account, bid.token_mint, bid.token_size, None)?;
        }
        None => {
            if ctx.metadata.metadata(bid.token_mint).is_none() {
                return Err(HausError::MetadataNotFound(*bid.token_mint));
            }
        }
    }

    verify_program_address(
        ESCROW,
        &seeds::escrow(bid.auction_house, bid.wallet),
        bid.escrow_payment_bump,
        ctx.program_id,
        bid.escrow_payment_account,
    )?;

    let order = TradeStateSeeds {
        wallet: *bid.wallet,
        auction_house: *bid.auction_house,
        token_account: bid.token_account.copied(),
        currency_mint: house.currency_mint,
        token_mint: *bid.token_mint,
        price: bid.buyer_price,
        token_size: bid.token_size,
    };
    check_new_trade_state(
        ctx,
        "buyer_trade_state",
        &order,
        bid.trade_state_bump,
        bid.buyer_trade_state,
    )?;

    if bid.buyer_price > 0 {
        if !ctx.uow.exists(bid.escrow_payment_account)? {
            return Err(HausError::InsufficientFunds {
                needed: bid.buyer_price,
                available: 0,
            });
        }
        let balance = vault_balance(ctx.uow, ESCROW, bid.escrow_payment_account)?;
        ctx.uow
            .vault_mut(ESCROW, bid.escrow_payment_account)?
            .commit(balance, bid.buyer_price)?;
    }

    ctx.uow.create(
        "buyer_trade_state",
        bid.buyer_trade_state,
        bid.wallet,
        AccountData::TradeState(TradeState::new(bid.trade_state_bump, OrderSide::Buy)),
    )?;

    tracing::debug!(
        buyer = %bid.wallet.short(),
        trade_state = %bid.buyer_trade_state.short(),
        public = bid.token_account.is_none(),
        price = bid.buyer_price,
        size = bid.token_size,
        "Bid posted"
    );
    Ok(
        ReceiptBody::new(ReceiptKind::Bid, *bid.auction_house, *bid.wallet).with_order(
            *bid.buyer_trade_state,
            *bid.token_mint,
            bid.buyer_price,
            bid.token_size,
        ),
    )
}

pub(super) fn buy(ctx: &mut Context<'_, '_>, ix: &Buy) -> Result<ReceiptBody> {
    bid(
        ctx,
        &Bid {
            wallet: &ix.wallet,
            token_account: Some(&ix.token_account),
            token_mint: &ix.token_mint,
            auction_house: &ix.auction_house,
            escrow_payment_account: &ix.escrow_payment_account,
            escrow_payment_bump: ix.escrow_payment_bump,
            buyer_trade_state: &ix.buyer_trade_state,
            trade_state_bump: ix.trade_state_bump,
            buyer_price: ix.buyer_price,
            token_size: ix.token_size,
        },
    )
}

pub(super) fn public_buy(ctx: &mut Context<'_, '_>, ix: &PublicBuy) -> Result<ReceiptBody> {
    bid(
        ctx,
        &Bid {
            wallet: &ix.wallet,
            token_account: None,
            token_mint: &ix.token_mint,
            auction_house: &ix.auction_house,
            escrow_payment_account: &ix.escrow_payment_account,
            escrow_payment_bump: ix.escrow_payment_bump,
            buyer_trade_state: &ix.buyer_trade_state,
            trade_state_bump: ix.trade_state_bump,
            buyer_price: ix.buyer_price,
            token_size: ix.token_size,
        },
    )
}

pub(super) fn cancel(ctx: &mut Context<'_, '_>, ix: &Cancel) -> Result<ReceiptBody> {
    let house = load_house(ctx, &ix.auction_house)?;
    require_wallet_or_authority(ctx, &house, &ix.wallet, &ix.authority)?;

    let order = TradeStateSeeds {
        wallet: ix.wallet,
        auction_house: ix.auction_house,
        token_account: ix.token_account,
        currency_mint: house.currency_mint,
        token_mint: ix.token_mint,
        price: ix.buyer_price,
        token_size: ix.token_size,
    };
    order.with_seeds(|s| {
        verify_program_address(
            "trade_state",
            s,
            ix.trade_state_bump,
            ctx.program_id,
            &ix.trade_state,
        )
    })?;
    let side = ctx.uow.trade_state("trade_state", &ix.trade_state)?.side;

    let kind = match side {
        OrderSide::Sell => {
            let token_account = ix.token_account.ok_or_else(|| {
                HausError::Internal("listing trade state without an asset account".into())
            })?;
            cancel_listing(ctx, ix, &order, &token_account)?;
            ReceiptKind::ListingCancelled
        }
        OrderSide::Buy => {
            if ix.buyer_price > 0 {
                verify_program_address(
                    ESCROW,
                    &seeds::escrow(&ix.auction_house, &ix.wallet),
                    ix.escrow_payment_bump,
                    ctx.program_id,
                    &ix.escrow_payment_account,
                )?;
                ctx.uow
                    .vault_mut(ESCROW, &ix.escrow_payment_account)?
                    .release(ix.buyer_price)?;
            }
            ReceiptKind::BidCancelled
        }
    };

    ctx.uow.close("trade_state", &ix.trade_state, &ix.wallet)?;
    tracing::debug!(
        wallet = %ix.wallet.short(),
        trade_state = %ix.trade_state.short(),
        side = %side,
        "Order cancelled"
    );
    Ok(
        ReceiptBody::new(kind, ix.auction_house, ix.wallet).with_order(
            ix.trade_state,
            ix.token_mint,
            ix.buyer_price,
            ix.token_size,
        ),
    )
}

fn cancel_listing(
    ctx: &mut Context<'_, '_>,
    ix: &Cancel,
    order: &TradeStateSeeds,
    token_account: &Address,
) -> Result<()> {
    if ix.buyer_price != 0 {
        order.free().with_seeds(|s| {
            verify_program_address(
                "free_trade_state",
                s,
                ix.free_trade_state_bump,
                ctx.program_id,
                &ix.free_trade_state,
            )
        })?;
        if ctx.uow.exists(&ix.free_trade_state)? {
            ctx.uow
                .close("free_trade_state", &ix.free_trade_state, &ix.wallet)?;
        }
    }

    // Revoking needs the owner; an authority-only cancel leaves the
    // delegation, which is inert once no trade state backs it.
    if ctx.signers.contains(&ix.wallet) {
        let program_signer =
            ProgramSigner::verify(ctx.program_id, ix.program_as_signer, ix.program_as_signer_bump)?
                .address();
        let token = ctx.uow.token_account_mut("token_account", token_account)?;
        if token.delegate == Some(program_signer) {
            token.revoke(*token_account, &ix.wallet)?;
        }
    }
    Ok(())
}
