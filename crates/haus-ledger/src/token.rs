//! Token custody: balances of a mint held for an owner, with an optional
//! delegate.
//!
//! Authority rules:
//! - `approve` and `revoke` need the owner.
//! - `debit` accepts the owner, or the delegate up to `delegated_amount`.
//!   A delegated debit consumes the allowance; an exhausted allowance
//!   clears the delegate.

use haus_types::{Address, HausError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Address,
    pub owner: Address,
    pub amount: u64,
    pub delegate: Option<Address>,
    pub delegated_amount: u64,
}

impl TokenAccount {
    #[must_use]
    pub fn new(mint: Address, owner: Address) -> Self {
        Self {
            mint,
            owner,
            amount: 0,
            delegate: None,
            delegated_amount: 0,
        }
    }

    fn require_owner(&self, address: Address, authority: &Address) -> Result<()> {
        if *authority != self.owner {
            return Err(HausError::InvalidTokenAccount {
                address,
                reason: format!("{} is not the owner", authority.short()),
            });
        }
        Ok(())
    }

    /// Grant `delegate` the right to move up to `amount`.
    ///
    /// `address` is this account's own address, used in errors.
    pub fn approve(
        &mut self,
        address: Address,
        authority: &Address,
        delegate: Address,
        amount: u64,
    ) -> Result<()> {
        self.require_owner(address, authority)?;
        self.delegate = Some(delegate);
        self.delegated_amount = amount;
        Ok(())
    }

    pub fn revoke(&mut self, address: Address, authority: &Address) -> Result<()> {
        self.require_owner(address, authority)?;
        self.delegate = None;
        self.delegated_amount = 0;
        Ok(())
    }

    /// Whether `delegate` may currently move `amount`.
    #[must_use]
    pub fn is_delegated_to(&self, delegate: &Address, amount: u64) -> bool {
        self.delegate.as_ref() == Some(delegate) && self.delegated_amount >= amount
    }

    /// Remove `amount` under `authority`.
    pub fn debit(&mut self, address: Address, authority: &Address, amount: u64) -> Result<()> {
        if self.amount < amount {
            return Err(HausError::InvalidTokenAmount {
                needed: amount,
                held: self.amount,
            });
        }
        if *authority == self.owner {
            self.amount -= amount;
            return Ok(());
        }
        if !self.is_delegated_to(authority, amount) {
            return Err(HausError::InvalidTokenAccount {
                address,
                reason: format!(
                    "{} is neither owner nor a delegate for {amount}",
                    authority.short()
                ),
            });
        }
        self.amount -= amount;
        self.delegated_amount -= amount;
        if self.delegated_amount == 0 {
            self.delegate = None;
        }
        Ok(())
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.amount = self
            .amount
            .checked_add(amount)
            .ok_or(HausError::NumericalOverflow)?;
        Ok(())
    }
}
