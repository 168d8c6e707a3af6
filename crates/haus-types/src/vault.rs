//! Custody records: the per-buyer escrow and the house fee/treasury accounts.
//!
//! For the native currency a vault's balance is its lamports above the rent
//! minimum. For a token currency it is [`Vault::token_balance`].
//!
//! Escrow vaults also track `committed`: the sum of prices of open bids
//! that reference them. Withdrawals may not dip below it.

use serde::{Deserialize, Serialize};

use crate::{Address, HausError, Result};

/// What a vault is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultRole {
    /// A buyer's pre-funded bidding balance.
    Escrow { wallet: Address },
    /// Accumulated marketplace fees.
    Fee,
    Treasury,
}

impl std::fmt::Display for VaultRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Escrow { .. } => write!(f, "ESCROW"),
            Self::Fee => write!(f, "FEE"),
            Self::Treasury => write!(f, "TREASURY"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    pub role: VaultRole,
    pub auction_house: Address,
    pub currency_mint: Address,
    pub bump: u8,
    /// Balance held when the currency is a token. Always zero for native.
    pub token_balance: u64,
    /// Escrow only: funds promised to open bids.
    pub committed: u64,
}

impl Vault {
    #[must_use]
    pub fn new(role: VaultRole, auction_house: Address, currency_mint: Address, bump: u8) -> Self {
        Self {
            role,
            auction_house,
            currency_mint,
            bump,
            token_balance: 0,
            committed: 0,
        }
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.currency_mint.is_native_mint()
    }

    /// The escrow owner, if this is an escrow vault.
    #[must_use]
    pub fn escrow_wallet(&self) -> Option<Address> {
        match self.role {
            VaultRole::Escrow { wallet } => Some(wallet),
            VaultRole::Fee | VaultRole::Treasury => None,
        }
    }

    /// Reserve `amount` of `balance` for a new bid.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if `balance - committed < amount`.
    pub fn commit(&mut self, balance: u64, amount: u64) -> Result<()> {
        let free = balance.saturating_sub(self.committed);
        if free < amount {
            return Err(HausError::InsufficientFunds {
                needed: amount,
                available: free,
            });
        }
        self.committed = self
            .committed
            .checked_add(amount)
            .ok_or(HausError::NumericalOverflow)?;
        Ok(())
    }

    /// Drop a bid's reservation (cancel or settlement).
    ///
    /// # Errors
    /// Returns `Internal` if the reservation was never made.
    pub fn release(&mut self, amount: u64) -> Result<()> {
        self.committed = self.committed.checked_sub(amount).ok_or_else(|| {
            HausError::Internal(format!(
                "releasing {amount} from escrow with only {} committed",
                self.committed
            ))
        })?;
        Ok(())
    }

    /// Check that taking `amount` out of `balance` leaves open bids covered.
    ///
    /// # Errors
    /// Returns `InsufficientFunds` if the withdrawal would under-collateralize.
    pub fn check_withdrawable(&self, balance: u64, amount: u64) -> Result<()> {
        let free = balance.saturating_sub(self.committed);
        if amount > free {
            return Err(HausError::InsufficientFunds {
                needed: amount,
                available: free,
            });
        }
        Ok(())
    }
}
