//! One module per transition family.
//!
//! Handlers read and write only through the [`Context`]'s unit of work and
//! return the receipt body describing what they did. They never commit.

mod escrow;
mod execute_sale;
mod house;
mod house_funds;
mod orders;

use haus_ledger::{SignerSet, UnitOfWork};
use haus_types::{
    constants, seeds, verify_program_address, Address, AuctionHouse, HausError, ReceiptBody,
    Result, Vault,
};

use crate::instruction::Instruction;
use crate::metadata::MetadataProvider;

pub(crate) struct Context<'a, 'l> {
    pub uow: &'a mut UnitOfWork<'l>,
    pub signers: &'a mut SignerSet,
    pub program_id: &'a Address,
    pub metadata: &'a dyn MetadataProvider,
}

pub(crate) fn dispatch(ctx: &mut Context<'_, '_>, instruction: &Instruction) -> Result<ReceiptBody> {
    match instruction {
        Instruction::CreateAuctionHouse(ix) => house::create(ctx, ix),
        Instruction::UpdateAuctionHouse(ix) => house::update(ctx, ix),
        Instruction::Deposit(ix) => escrow::deposit(ctx, ix),
        Instruction::Withdraw(ix) => escrow::withdraw(ctx, ix),
        Instruction::Sell(ix) => orders::sell(ctx, ix),
        Instruction::Buy(ix) => orders::buy(ctx, ix),
        Instruction::PublicBuy(ix) => orders::public_buy(ctx, ix),
        Instruction::Cancel(ix) => orders::cancel(ctx, ix),
        Instruction::ExecuteSale(ix) => execute_sale::execute_sale(ctx, ix),
        Instruction::WithdrawFromFee(ix) => house_funds::withdraw_from_fee(ctx, ix),
        Instruction::WithdrawFromTreasury(ix) => house_funds::withdraw_from_treasury(ctx, ix),
    }
}

/// Load the house at `address` and check it re-derives from its stored bump.
fn load_house(ctx: &Context<'_, '_>, address: &Address) -> Result<AuctionHouse> {
    let house = ctx.uow.auction_house(address)?.clone();
    verify_program_address(
        "auction_house",
        &seeds::auction_house(&house.creator, &house.currency_mint),
        house.bump,
        ctx.program_id,
        address,
    )?;
    Ok(house)
}

/// Require the stored authority to have signed.
fn require_authority(ctx: &Context<'_, '_>, house: &AuctionHouse, claimed: &Address) -> Result<()> {
    if claimed != &house.authority {
        return Err(HausError::unauthorized(format!(
            "{} is not the house authority",
            claimed.short()
        )));
    }
    ctx.signers.require(&house.authority, "authority")
}

/// Require `wallet`, or the stored authority acting for it, to have signed.
fn require_wallet_or_authority(
    ctx: &Context<'_, '_>,
    house: &AuctionHouse,
    wallet: &Address,
    claimed_authority: &Address,
) -> Result<()> {
    if ctx.signers.contains(wallet)
        || (*claimed_authority == house.authority && ctx.signers.contains(&house.authority))
    {
        return Ok(());
    }
    Err(HausError::unauthorized(format!(
        "neither wallet {} nor the authority signed",
        wallet.short()
    )))
}

fn assert_keys_equal(account: &'static str, expected: &Address, actual: &Address) -> Result<()> {
    if expected != actual {
        return Err(HausError::PublicKeyMismatch {
            account,
            expected: *expected,
            actual: *actual,
        });
    }
    Ok(())
}

/// Settlement-currency balance a vault can pay out.
///
/// Native vaults keep their rent minimum; token vaults hold `token_balance`.
fn vault_balance(uow: &UnitOfWork<'_>, account: &'static str, address: &Address) -> Result<u64> {
    let vault = uow.vault(account, address)?;
    if vault.is_native() {
        let rent_floor = uow.rent().minimum_balance(constants::VAULT_SIZE);
        Ok(uow.lamports(address)?.saturating_sub(rent_floor))
    } else {
        Ok(vault.token_balance)
    }
}

/// Move settlement currency out of a vault.
///
/// Native: lamports to `destination`. Token: `token_balance` to the
/// `destination` token account, which must hold the vault's currency.
fn pay_from_vault(
    uow: &mut UnitOfWork<'_>,
    account: &'static str,
    vault: &Address,
    destination: &Address,
    amount: u64,
) -> Result<()> {
    let available = vault_balance(uow, account, vault)?;
    if amount > available {
        return Err(HausError::InsufficientFunds {
            needed: amount,
            available,
        });
    }
    let record: Vault = uow.vault(account, vault)?.clone();
    if record.is_native() {
        return uow.transfer_lamports(vault, destination, amount);
    }
    let receiving = uow.token_account("destination token account", destination)?;
    if receiving.mint != record.currency_mint {
        return Err(HausError::InvalidTokenAccount {
            address: *destination,
            reason: "does not hold the settlement currency".into(),
        });
    }
    uow.vault_mut(account, vault)?.token_balance -= amount;
    uow.token_account_mut("destination token account", destination)?
        .credit(amount)
}

/// Move settlement currency into a vault.
fn pay_into_vault(
    uow: &mut UnitOfWork<'_>,
    account: &'static str,
    vault: &Address,
    amount: u64,
) -> Result<()> {
    if uow.vault(account, vault)?.is_native() {
        return uow.credit_lamports(vault, amount);
    }
    let record = uow.vault_mut(account, vault)?;
    record.token_balance = record
        .token_balance
        .checked_add(amount)
        .ok_or(HausError::NumericalOverflow)?;
    Ok(())
}

/// Move settlement currency from one vault to another of the same house.
fn transfer_between_vaults(
    uow: &mut UnitOfWork<'_>,
    (from_account, from): (&'static str, &Address),
    (to_account, to): (&'static str, &Address),
    amount: u64,
) -> Result<()> {
    let available = vault_balance(uow, from_account, from)?;
    if amount > available {
        return Err(HausError::InsufficientFunds {
            needed: amount,
            available,
        });
    }
    if uow.vault(from_account, from)?.is_native() {
        uow.vault(to_account, to)?;
        return uow.transfer_lamports(from, to, amount);
    }
    uow.vault_mut(from_account, from)?.token_balance -= amount;
    pay_into_vault(uow, to_account, to, amount)
}

/// Check that a destination token account can receive `currency_mint` for `owner`.
fn assert_currency_account(
    uow: &UnitOfWork<'_>,
    account: &'static str,
    address: &Address,
    currency_mint: &Address,
    owner: Option<&Address>,
) -> Result<()> {
    let token = uow.token_account(account, address)?;
    if token.mint != *currency_mint {
        return Err(HausError::InvalidTokenAccount {
            address: *address,
            reason: format!("{account} does not hold the settlement currency"),
        });
    }
    if let Some(owner) = owner {
        assert_keys_equal(account, owner, &token.owner)?;
    }
    Ok(())
}
