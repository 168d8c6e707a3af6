//! The account store.
//!
//! A [`Ledger`] is an ordered map from [`Address`] to [`Account`]. Transitions
//! never write to it directly: they stage changes in a
//! [`UnitOfWork`](crate::UnitOfWork) and commit.
//!
//! The genesis helpers (`airdrop`, `create_token_account`, `mint_to`) stand
//! in for the surrounding chain: funding wallets and minting assets happen
//! outside any marketplace transition.

use std::collections::BTreeMap;

use haus_types::{Address, HausError, Rent, Result};

use crate::account::{Account, AccountData};
use crate::token::TokenAccount;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    accounts: BTreeMap<Address, Account>,
    rent: Rent,
}

impl Ledger {
    #[must_use]
    pub fn new(rent: Rent) -> Self {
        Self {
            accounts: BTreeMap::new(),
            rent,
        }
    }

    #[must_use]
    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    #[must_use]
    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    #[must_use]
    pub fn exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    /// Lamports at `address`, zero if absent.
    #[must_use]
    pub fn lamports(&self, address: &Address) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.lamports)
    }

    #[must_use]
    pub fn token_account(&self, address: &Address) -> Option<&TokenAccount> {
        self.accounts.get(address).and_then(Account::as_token)
    }

    /// Token amount at `address`, zero if absent or not a token account.
    #[must_use]
    pub fn token_amount(&self, address: &Address) -> u64 {
        self.token_account(address).map_or(0, |t| t.amount)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Sum of all lamports.
    #[must_use]
    pub fn total_lamports(&self) -> u128 {
        total_lamports(self.accounts.values())
    }

    /// Per-mint sum of token amounts, including token-currency vaults.
    #[must_use]
    pub fn token_supply(&self) -> BTreeMap<Address, u128> {
        token_supply(self.accounts.values())
    }

    pub(crate) fn snapshot(&self, address: &Address) -> Option<Account> {
        self.accounts.get(address).cloned()
    }

    pub(crate) fn apply(&mut self, changes: BTreeMap<Address, Option<Account>>) {
        for (address, account) in changes {
            match account {
                Some(account) => {
                    self.accounts.insert(address, account);
                }
                None => {
                    self.accounts.remove(&address);
                }
            }
        }
    }

    // =================================================================
    // Genesis
    // =================================================================

    /// Credit `lamports` to a wallet, creating it if absent.
    pub fn airdrop(&mut self, address: Address, lamports: u64) -> Result<()> {
        let account = self
            .accounts
            .entry(address)
            .or_insert_with(|| Account::system(0));
        account.lamports = account
            .lamports
            .checked_add(lamports)
            .ok_or(HausError::NumericalOverflow)?;
        Ok(())
    }

    /// Open an empty, rent-funded token account.
    pub fn create_token_account(
        &mut self,
        address: Address,
        mint: Address,
        owner: Address,
    ) -> Result<()> {
        if self.exists(&address) {
            return Err(HausError::DuplicateRecord {
                account: "token account",
                address,
            });
        }
        let data = AccountData::Token(TokenAccount::new(mint, owner));
        let lamports = self.rent.minimum_balance(data.len());
        self.accounts.insert(address, Account::new(lamports, data));
        Ok(())
    }

    /// Mint `amount` into an existing token account.
    pub fn mint_to(&mut self, address: Address, amount: u64) -> Result<()> {
        match self.accounts.get_mut(&address).map(|a| &mut a.data) {
            Some(AccountData::Token(token)) => token.credit(amount),
            Some(_) => Err(HausError::WrongAccountType {
                address,
                expected: "token account",
            }),
            None => Err(HausError::NotFound {
                account: "token account",
                address,
            }),
        }
    }
}

pub(crate) fn total_lamports<'a>(accounts: impl Iterator<Item = &'a Account>) -> u128 {
    accounts.map(|a| u128::from(a.lamports)).sum()
}

pub(crate) fn token_supply<'a>(
    accounts: impl Iterator<Item = &'a Account>,
) -> BTreeMap<Address, u128> {
    let mut supply = BTreeMap::new();
    for account in accounts {
        match &account.data {
            AccountData::Token(token) => {
                *supply.entry(token.mint).or_insert(0) += u128::from(token.amount);
            }
            AccountData::Vault(vault) if !vault.is_native() => {
                *supply.entry(vault.currency_mint).or_insert(0) += u128::from(vault.token_balance);
            }
            _ => {}
        }
    }
    supply.retain(|_, total| *total > 0);
    supply
}
