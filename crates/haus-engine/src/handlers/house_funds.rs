//! withdraw-fee / withdraw-treasury: authority payouts to the configured
//! destinations. A vault never pays out below its rent minimum.

use haus_types::{
    seeds, verify_program_address, Address, AuctionHouse, ReceiptBody, ReceiptKind, Result,
};

use super::{assert_keys_equal, load_house, pay_from_vault, require_authority, Context};
use crate::instruction::{WithdrawFromFee, WithdrawFromTreasury};

struct Payout<'a> {
    account: &'static str,
    vault: &'a Address,
    destination: &'a Address,
    amount: u64,
}

fn pay_out(ctx: &mut Context<'_, '_>, house: &AuctionHouse, payout: &Payout<'_>) -> Result<()> {
    pay_from_vault(
        ctx.uow,
        payout.account,
        payout.vault,
        payout.destination,
        payout.amount,
    )?;
    tracing::debug!(
        vault = payout.account,
        destination = %payout.destination.short(),
        amount = payout.amount,
        currency = %house.currency_mint.short(),
        "House funds withdrawn"
    );
    Ok(())
}

pub(super) fn withdraw_from_fee(
    ctx: &mut Context<'_, '_>,
    ix: &WithdrawFromFee,
) -> Result<ReceiptBody> {
    let house = load_house(ctx, &ix.auction_house)?;
    require_authority(ctx, &house, &ix.authority)?;
    assert_keys_equal("auction_house_fee_account", &house.fee_account, &ix.fee_account)?;
    verify_program_address(
        "auction_house_fee_account",
        &seeds::fee_account(&ix.auction_house),
        house.fee_account_bump,
        ctx.program_id,
        &ix.fee_account,
    )?;
    assert_keys_equal(
        "fee_withdrawal_destination",
        &house.fee_withdrawal_destination,
        &ix.fee_withdrawal_destination,
    )?;

    pay_out(
        ctx,
        &house,
        &Payout {
            account: "auction_house_fee_account",
            vault: &ix.fee_account,
            destination: &ix.fee_withdrawal_destination,
            amount: ix.amount,
        },
    )?;
    Ok(
        ReceiptBody::new(ReceiptKind::FeeWithdrawal, ix.auction_house, ix.authority)
            .with_amount(ix.amount),
    )
}

pub(super) fn withdraw_from_treasury(
    ctx: &mut Context<'_, '_>,
    ix: &WithdrawFromTreasury,
) -> Result<ReceiptBody> {
    let house = load_house(ctx, &ix.auction_house)?;
    require_authority(ctx, &house, &ix.authority)?;
    assert_keys_equal("auction_house_treasury", &house.treasury, &ix.treasury)?;
    verify_program_address(
        "auction_house_treasury",
        &seeds::treasury(&ix.auction_house),
        house.treasury_bump,
        ctx.program_id,
        &ix.treasury,
    )?;
    assert_keys_equal(
        "treasury_withdrawal_destination",
        &house.treasury_withdrawal_destination,
        &ix.treasury_withdrawal_destination,
    )?;

    pay_out(
        ctx,
        &house,
        &Payout {
            account: "auction_house_treasury",
            vault: &ix.treasury,
            destination: &ix.treasury_withdrawal_destination,
            amount: ix.amount,
        },
    )?;
    Ok(
        ReceiptBody::new(ReceiptKind::TreasuryWithdrawal, ix.auction_house, ix.authority)
            .with_amount(ix.amount),
    )
}
