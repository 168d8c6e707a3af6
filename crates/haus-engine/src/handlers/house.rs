//! create-config / update-config.

use haus_ledger::{AccountData, UnitOfWork};
use haus_types::{
    seeds, validate_basis_points, verify_canonical_address, Address, AuctionHouse, HausError,
    ReceiptBody, ReceiptKind, Result, Vault, VaultRole,
};

use super::{assert_currency_account, assert_keys_equal, load_house, require_authority, Context};
use crate::instruction::{CreateAuctionHouse, UpdateAuctionHouse};

/// Native houses pay treasury proceeds to a wallet, which must be its own
/// owner. Token houses pay into currency token accounts.
fn validate_treasury_destination(
    uow: &UnitOfWork<'_>,
    currency_mint: &Address,
    destination: &Address,
    owner: &Address,
) -> Result<()> {
    if currency_mint.is_native_mint() {
        assert_keys_equal("treasury_withdrawal_destination", owner, destination)
    } else {
        assert_currency_account(
            uow,
            "treasury_withdrawal_destination",
            destination,
            currency_mint,
            Some(owner),
        )
    }
}

fn validate_fee_destination(
    uow: &UnitOfWork<'_>,
    currency_mint: &Address,
    destination: &Address,
) -> Result<()> {
    if currency_mint.is_native_mint() {
        return Ok(());
    }
    assert_currency_account(
        uow,
        "fee_withdrawal_destination",
        destination,
        currency_mint,
        None,
    )
}

pub(super) fn create(ctx: &mut Context<'_, '_>, ix: &CreateAuctionHouse) -> Result<ReceiptBody> {
    ctx.signers.require(&ix.payer, "payer")?;
    ctx.signers.require(&ix.authority, "authority")?;
    validate_basis_points(ix.seller_fee_basis_points)?;

    verify_canonical_address(
        "auction_house",
        &seeds::auction_house(&ix.authority, &ix.currency_mint),
        ix.auction_house_bump,
        ctx.program_id,
        &ix.auction_house,
    )?;
    verify_canonical_address(
        "auction_house_fee_account",
        &seeds::fee_account(&ix.auction_house),
        ix.fee_account_bump,
        ctx.program_id,
        &ix.fee_account,
    )?;
    verify_canonical_address(
        "auction_house_treasury",
        &seeds::treasury(&ix.auction_house),
        ix.treasury_bump,
        ctx.program_id,
        &ix.treasury,
    )?;

    validate_fee_destination(ctx.uow, &ix.currency_mint, &ix.fee_withdrawal_destination)?;
    validate_treasury_destination(
        ctx.uow,
        &ix.currency_mint,
        &ix.treasury_withdrawal_destination,
        &ix.treasury_withdrawal_destination_owner,
    )?;

    let house = AuctionHouse {
        fee_account: ix.fee_account,
        treasury: ix.treasury,
        treasury_withdrawal_destination: ix.treasury_withdrawal_destination,
        fee_withdrawal_destination: ix.fee_withdrawal_destination,
        currency_mint: ix.currency_mint,
        authority: ix.authority,
        creator: ix.authority,
        bump: ix.auction_house_bump,
        treasury_bump: ix.treasury_bump,
        fee_account_bump: ix.fee_account_bump,
        seller_fee_basis_points: ix.seller_fee_basis_points,
        requires_sign_off: ix.requires_sign_off,
        can_change_sale_price: ix.can_change_sale_price,
    };
    ctx.uow.create(
        "auction_house",
        &ix.auction_house,
        &ix.payer,
        AccountData::AuctionHouse(house),
    )?;
    ctx.uow.create(
        "auction_house_fee_account",
        &ix.fee_account,
        &ix.payer,
        AccountData::Vault(Vault::new(
            VaultRole::Fee,
            ix.auction_house,
            ix.currency_mint,
            ix.fee_account_bump,
        )),
    )?;
    ctx.uow.create(
        "auction_house_treasury",
        &ix.treasury,
        &ix.payer,
        AccountData::Vault(Vault::new(
            VaultRole::Treasury,
            ix.auction_house,
            ix.currency_mint,
            ix.treasury_bump,
        )),
    )?;

    tracing::debug!(
        auction_house = %ix.auction_house.short(),
        fee_bps = ix.seller_fee_basis_points,
        requires_sign_off = ix.requires_sign_off,
        can_change_sale_price = ix.can_change_sale_price,
        "Auction house allocated"
    );
    Ok(ReceiptBody::new(
        ReceiptKind::AuctionHouseCreated,
        ix.auction_house,
        ix.authority,
    ))
}

pub(super) fn update(ctx: &mut Context<'_, '_>, ix: &UpdateAuctionHouse) -> Result<ReceiptBody> {
    let mut house = load_house(ctx, &ix.auction_house)?;
    require_authority(ctx, &house, &ix.authority)?;

    if let Some(basis_points) = ix.seller_fee_basis_points {
        validate_basis_points(basis_points)?;
        house.seller_fee_basis_points = basis_points;
    }
    if let Some(requires_sign_off) = ix.requires_sign_off {
        house.requires_sign_off = requires_sign_off;
    }
    if let Some(can_change_sale_price) = ix.can_change_sale_price {
        house.can_change_sale_price = can_change_sale_price;
    }
    if let Some(destination) = ix.fee_withdrawal_destination {
        validate_fee_destination(ctx.uow, &house.currency_mint, &destination)?;
        house.fee_withdrawal_destination = destination;
    }
    if let Some(destination) = ix.treasury_withdrawal_destination {
        let owner = ix.treasury_withdrawal_destination_owner.ok_or_else(|| {
            HausError::Configuration(
                "treasury_withdrawal_destination_owner is required with a new destination".into(),
            )
        })?;
        validate_treasury_destination(ctx.uow, &house.currency_mint, &destination, &owner)?;
        house.treasury_withdrawal_destination = destination;
    } else if ix.treasury_withdrawal_destination_owner.is_some() {
        return Err(HausError::Configuration(
            "treasury_withdrawal_destination_owner given without a new destination".into(),
        ));
    }
    if let Some(new_authority) = ix.new_authority {
        house.authority = new_authority;
    }

    *ctx.uow.auction_house_mut(&ix.auction_house)? = house;
    Ok(ReceiptBody::new(
        ReceiptKind::AuctionHouseUpdated,
        ix.auction_house,
        ix.authority,
    ))
}
