//! All-or-nothing staging area for one transition.
//!
//! [`Ledger::begin`] snapshots the declared accounts. Every read and write
//! goes to the snapshot; touching an undeclared address fails with
//! `AccountNotDeclared`. [`UnitOfWork::commit`] checks conservation over the
//! declared set and writes everything back in one step. Dropping the unit
//! of work without committing leaves the ledger untouched.

use std::collections::BTreeMap;

use haus_types::{Address, AuctionHouse, HausError, Rent, Result, TradeState, Vault};

use crate::account::{Account, AccountData};
use crate::store::{token_supply, total_lamports, Ledger};
use crate::token::TokenAccount;

impl Ledger {
    /// Open a unit of work over `declared`.
    pub fn begin(&mut self, declared: impl IntoIterator<Item = Address>) -> UnitOfWork<'_> {
        let before: BTreeMap<Address, Option<Account>> = declared
            .into_iter()
            .map(|address| (address, self.snapshot(&address)))
            .collect();
        let staged = before.clone();
        UnitOfWork {
            rent: *self.rent(),
            ledger: self,
            before,
            staged,
        }
    }
}

#[derive(Debug)]
pub struct UnitOfWork<'a> {
    ledger: &'a mut Ledger,
    rent: Rent,
    before: BTreeMap<Address, Option<Account>>,
    staged: BTreeMap<Address, Option<Account>>,
}

impl UnitOfWork<'_> {
    #[must_use]
    pub fn rent(&self) -> &Rent {
        &self.rent
    }

    #[must_use]
    pub fn is_declared(&self, address: &Address) -> bool {
        self.staged.contains_key(address)
    }

    fn slot(&self, address: &Address) -> Result<&Option<Account>> {
        self.staged
            .get(address)
            .ok_or(HausError::AccountNotDeclared(*address))
    }

    fn slot_mut(&mut self, address: &Address) -> Result<&mut Option<Account>> {
        self.staged
            .get_mut(address)
            .ok_or(HausError::AccountNotDeclared(*address))
    }

    pub fn get(&self, address: &Address) -> Result<Option<&Account>> {
        Ok(self.slot(address)?.as_ref())
    }

    pub fn exists(&self, address: &Address) -> Result<bool> {
        Ok(self.slot(address)?.is_some())
    }

    /// Lamports at `address`, zero if absent.
    pub fn lamports(&self, address: &Address) -> Result<u64> {
        Ok(self.slot(address)?.as_ref().map_or(0, |a| a.lamports))
    }

    fn typed<'s, T>(
        &'s self,
        account: &'static str,
        address: &Address,
        pick: impl FnOnce(&'s AccountData) -> Option<&'s T>,
    ) -> Result<&'s T> {
        match self.slot(address)? {
            None => Err(HausError::NotFound {
                account,
                address: *address,
            }),
            Some(found) => pick(&found.data).ok_or(HausError::WrongAccountType {
                address: *address,
                expected: account,
            }),
        }
    }

    fn typed_mut<'s, T>(
        &'s mut self,
        account: &'static str,
        address: &Address,
        pick: impl FnOnce(&'s mut AccountData) -> Option<&'s mut T>,
    ) -> Result<&'s mut T> {
        let address = *address;
        match self.slot_mut(&address)? {
            None => Err(HausError::NotFound { account, address }),
            Some(found) => pick(&mut found.data).ok_or(HausError::WrongAccountType {
                address,
                expected: account,
            }),
        }
    }

    pub fn auction_house(&self, address: &Address) -> Result<&AuctionHouse> {
        self.typed("auction_house", address, |data| match data {
            AccountData::AuctionHouse(house) => Some(house),
            _ => None,
        })
    }

    pub fn auction_house_mut(&mut self, address: &Address) -> Result<&mut AuctionHouse> {
        self.typed_mut("auction_house", address, |data| match data {
            AccountData::AuctionHouse(house) => Some(house),
            _ => None,
        })
    }

    pub fn vault(&self, account: &'static str, address: &Address) -> Result<&Vault> {
        self.typed(account, address, |data| match data {
            AccountData::Vault(vault) => Some(vault),
            _ => None,
        })
    }

    pub fn vault_mut(&mut self, account: &'static str, address: &Address) -> Result<&mut Vault> {
        self.typed_mut(account, address, |data| match data {
            AccountData::Vault(vault) => Some(vault),
            _ => None,
        })
    }

    pub fn trade_state(&self, account: &'static str, address: &Address) -> Result<&TradeState> {
        self.typed(account, address, |data| match data {
            AccountData::TradeState(state) => Some(state),
            _ => None,
        })
    }

    pub fn token_account(&self, account: &'static str, address: &Address) -> Result<&TokenAccount> {
        self.typed(account, address, |data| match data {
            AccountData::Token(token) => Some(token),
            _ => None,
        })
    }

    pub fn token_account_mut(
        &mut self,
        account: &'static str,
        address: &Address,
    ) -> Result<&mut TokenAccount> {
        self.typed_mut(account, address, |data| match data {
            AccountData::Token(token) => Some(token),
            _ => None,
        })
    }

    // =================================================================
    // Lamports
    // =================================================================

    pub fn debit_lamports(&mut self, address: &Address, amount: u64) -> Result<()> {
        let slot = self.slot_mut(address)?;
        let available = slot.as_ref().map_or(0, |a| a.lamports);
        match slot {
            Some(account) if account.lamports >= amount => {
                account.lamports -= amount;
                Ok(())
            }
            _ => Err(HausError::InsufficientFunds {
                needed: amount,
                available,
            }),
        }
    }

    /// Credit lamports, opening a system account if nothing lives there.
    pub fn credit_lamports(&mut self, address: &Address, amount: u64) -> Result<()> {
        let account = self
            .slot_mut(address)?
            .get_or_insert_with(|| Account::system(0));
        account.lamports = account
            .lamports
            .checked_add(amount)
            .ok_or(HausError::NumericalOverflow)?;
        Ok(())
    }

    pub fn transfer_lamports(&mut self, from: &Address, to: &Address, amount: u64) -> Result<()> {
        self.debit_lamports(from, amount)?;
        self.credit_lamports(to, amount)
    }

    // =================================================================
    // Tokens
    // =================================================================

    /// Move `amount` between token accounts of the same mint.
    pub fn transfer_tokens(
        &mut self,
        source: &Address,
        destination: &Address,
        authority: &Address,
        amount: u64,
    ) -> Result<()> {
        let source_mint = self.token_account("source token account", source)?.mint;
        let destination_mint = self
            .token_account("destination token account", destination)?
            .mint;
        if source_mint != destination_mint {
            return Err(HausError::InvalidTokenAccount {
                address: *destination,
                reason: format!(
                    "mint {} does not match source mint {}",
                    destination_mint.short(),
                    source_mint.short()
                ),
            });
        }
        self.token_account_mut("source token account", source)?
            .debit(*source, authority, amount)?;
        self.token_account_mut("destination token account", destination)?
            .credit(amount)
    }

    // =================================================================
    // Record lifecycle
    // =================================================================

    /// Allocate a record at `address`, funding its rent minimum from `payer`.
    ///
    /// Lamports already sitting at a plain address count towards the rent.
    /// Returns the lamports taken from `payer`.
    ///
    /// # Errors
    /// - `DuplicateRecord` if a typed record already lives there
    /// - `InsufficientFunds` if `payer` cannot cover the rent
    pub fn create(
        &mut self,
        account: &'static str,
        address: &Address,
        payer: &Address,
        data: AccountData,
    ) -> Result<u64> {
        let existing = match self.slot(address)? {
            Some(found) if !found.is_system() => {
                return Err(HausError::DuplicateRecord {
                    account,
                    address: *address,
                });
            }
            Some(found) => found.lamports,
            None => 0,
        };
        let required = self.rent.minimum_balance(data.len());
        let top_up = required.saturating_sub(existing);
        self.debit_lamports(payer, top_up)?;
        *self.slot_mut(address)? = Some(Account::new(existing + top_up, data));
        Ok(top_up)
    }

    /// Remove the record at `address`, sending all its lamports to
    /// `recipient`. Returns the lamports released.
    pub fn close(
        &mut self,
        account: &'static str,
        address: &Address,
        recipient: &Address,
    ) -> Result<u64> {
        if !self.is_declared(recipient) {
            return Err(HausError::AccountNotDeclared(*recipient));
        }
        let closed = self.slot_mut(address)?.take().ok_or(HausError::NotFound {
            account,
            address: *address,
        })?;
        self.credit_lamports(recipient, closed.lamports)?;
        Ok(closed.lamports)
    }

    // =================================================================
    // Commit
    // =================================================================

    /// Check conservation and rent, then write every staged change.
    ///
    /// # Errors
    /// - `SupplyInvariantViolation` if lamports or any mint's supply changed
    /// - `InsufficientFunds` if a record fell below its rent minimum
    pub fn commit(mut self) -> Result<()> {
        for slot in self.staged.values_mut() {
            if slot.as_ref().is_some_and(|a| a.is_system() && a.lamports == 0) {
                *slot = None;
            }
        }

        for account in self.staged.values().flatten() {
            if account.is_system() {
                continue;
            }
            let needed = self.rent.minimum_balance(account.data.len());
            if account.lamports < needed {
                return Err(HausError::InsufficientFunds {
                    needed,
                    available: account.lamports,
                });
            }
        }

        let lamports_before = total_lamports(self.before.values().flatten());
        let lamports_after = total_lamports(self.staged.values().flatten());
        if lamports_before != lamports_after {
            return Err(HausError::SupplyInvariantViolation {
                reason: format!("lamports {lamports_before} -> {lamports_after}"),
            });
        }

        let tokens_before = token_supply(self.before.values().flatten());
        let tokens_after = token_supply(self.staged.values().flatten());
        if tokens_before != tokens_after {
            return Err(HausError::SupplyInvariantViolation {
                reason: format!("token supply {tokens_before:?} -> {tokens_after:?}"),
            });
        }

        let touched = self.staged.len();
        self.ledger.apply(std::mem::take(&mut self.staged));
        tracing::debug!(accounts = touched, "Unit of work committed");
        Ok(())
    }
}
