//! Escrow deposit / withdraw.
//!
//! A buyer's escrow is created on first deposit and closed, rent returned to
//! the wallet, once it is empty and backs no open bid.

use haus_ledger::AccountData;
use haus_types::{
    seeds, verify_canonical_address, verify_program_address, ReceiptBody, ReceiptKind, Result,
    Vault, VaultRole,
};

use super::{
    assert_currency_account, assert_keys_equal, load_house, pay_from_vault, pay_into_vault,
    require_wallet_or_authority, vault_balance, Context,
};
use crate::instruction::{Deposit, Withdraw};

const ESCROW: &str = "escrow_payment_account";

pub(super) fn deposit(ctx: &mut Context<'_, '_>, ix: &Deposit) -> Result<ReceiptBody> {
    ctx.signers.require(&ix.wallet, "wallet")?;
    let house = load_house(ctx, &ix.auction_house)?;
    let escrow_seeds = seeds::escrow(&ix.auction_house, &ix.wallet);

    let has_record = ctx
        .uow
        .get(&ix.escrow_payment_account)?
        .is_some_and(|a| !a.is_system());
    if has_record {
        verify_program_address(
            ESCROW,
            &escrow_seeds,
            ix.escrow_payment_bump,
            ctx.program_id,
            &ix.escrow_payment_account,
        )?;
    } else {
        verify_canonical_address(
            ESCROW,
            &escrow_seeds,
            ix.escrow_payment_bump,
            ctx.program_id,
            &ix.escrow_payment_account,
        )?;
        ctx.uow.create(
            ESCROW,
            &ix.escrow_payment_account,
            &ix.wallet,
            AccountData::Vault(Vault::new(
                VaultRole::Escrow { wallet: ix.wallet },
                ix.auction_house,
                house.currency_mint,
                ix.escrow_payment_bump,
            )),
        )?;
        tracing::debug!(
            wallet = %ix.wallet.short(),
            escrow = %ix.escrow_payment_account.short(),
            "Escrow opened"
        );
    }

    if house.is_native() {
        assert_keys_equal("payment_account", &ix.wallet, &ix.payment_account)?;
        ctx.uow
            .transfer_lamports(&ix.wallet, &ix.escrow_payment_account, ix.amount)?;
    } else {
        assert_currency_account(
            ctx.uow,
            "payment_account",
            &ix.payment_account,
            &house.currency_mint,
            Some(&ix.wallet),
        )?;
        ctx.uow
            .token_account_mut("payment_account", &ix.payment_account)?
            .debit(ix.payment_account, &ix.wallet, ix.amount)?;
        pay_into_vault(ctx.uow, ESCROW, &ix.escrow_payment_account, ix.amount)?;
    }

    Ok(ReceiptBody::new(ReceiptKind::Deposit, ix.auction_house, ix.wallet).with_amount(ix.amount))
}

pub(super) fn withdraw(ctx: &mut Context<'_, '_>, ix: &Withdraw) -> Result<ReceiptBody> {
    let house = load_house(ctx, &ix.auction_house)?;
    require_wallet_or_authority(ctx, &house, &ix.wallet, &ix.authority)?;
    verify_program_address(
        ESCROW,
        &seeds::escrow(&ix.auction_house, &ix.wallet),
        ix.escrow_payment_bump,
        ctx.program_id,
        &ix.escrow_payment_account,
    )?;

    if house.is_native() {
        assert_keys_equal("receipt_account", &ix.wallet, &ix.receipt_account)?;
    } else {
        assert_currency_account(
            ctx.uow,
            "receipt_account",
            &ix.receipt_account,
            &house.currency_mint,
            Some(&ix.wallet),
        )?;
    }

    let balance = vault_balance(ctx.uow, ESCROW, &ix.escrow_payment_account)?;
    ctx.uow
        .vault(ESCROW, &ix.escrow_payment_account)?
        .check_withdrawable(balance, ix.amount)?;
    pay_from_vault(
        ctx.uow,
        ESCROW,
        &ix.escrow_payment_account,
        &ix.receipt_account,
        ix.amount,
    )?;

    let remaining = vault_balance(ctx.uow, ESCROW, &ix.escrow_payment_account)?;
    let committed = ctx.uow.vault(ESCROW, &ix.escrow_payment_account)?.committed;
    if remaining == 0 && committed == 0 {
        ctx.uow
            .close(ESCROW, &ix.escrow_payment_account, &ix.wallet)?;
        tracing::debug!(
            wallet = %ix.wallet.short(),
            escrow = %ix.escrow_payment_account.short(),
            "Escrow drained and closed"
        );
    }

    Ok(ReceiptBody::new(ReceiptKind::Withdraw, ix.auction_house, ix.wallet).with_amount(ix.amount))
}
