//! The transition engine.
//!
//! ```text
//! SignedTransaction
//!     │ replay check ─▶ signature verification ─▶ Ledger::begin(accounts)
//!     ▼
//! handler (stages every read/write in the unit of work)
//!     │ receipt issued ─▶ commit (conservation + rent checks)
//!     ▼
//! replay guard marked, receipt journaled
//! ```
//!
//! Any error before the commit returns drops the unit of work, so a failed
//! transition leaves no trace in the ledger, the replay guard or the
//! journal.

use haus_ledger::{Ledger, SignerSet};
use haus_types::{Address, EngineConfig, Receipt, Result};

use crate::handlers::{self, Context};
use crate::instruction::SignedTransaction;
use crate::journal::Journal;
use crate::metadata::{InMemoryMetadata, MetadataProvider};
use crate::replay::ReplayGuard;

#[derive(Debug)]
pub struct AuctionHouseEngine<M = InMemoryMetadata> {
    config: EngineConfig,
    ledger: Ledger,
    metadata: M,
    replay: ReplayGuard,
    journal: Journal,
}

impl<M: MetadataProvider> AuctionHouseEngine<M> {
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(config: EngineConfig, metadata: M) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            program_id = %config.program_id.short(),
            replay_cache_size = config.replay_cache_size,
            "Auction house engine started"
        );
        Ok(Self {
            ledger: Ledger::new(config.rent),
            replay: ReplayGuard::new(config.replay_cache_size),
            journal: Journal::new(),
            metadata,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn program_id(&self) -> &Address {
        &self.config.program_id
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Direct ledger access for genesis: funding wallets, minting assets.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    #[must_use]
    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut M {
        &mut self.metadata
    }

    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Apply one transaction atomically.
    ///
    /// # Errors
    /// Any [`haus_types::HausError`]; the ledger is unchanged when one is returned.
    pub fn process(&mut self, tx: &SignedTransaction) -> Result<Receipt> {
        let instruction = tx.instruction.name();
        match self.try_process(tx) {
            Ok(receipt) => {
                tracing::info!(
                    tx = %receipt.transaction_id,
                    instruction,
                    receipt = %receipt.id,
                    kind = %receipt.kind(),
                    wallet = %receipt.body.wallet.short(),
                    amount = receipt.body.amount,
                    "Transition committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(
                    instruction,
                    kind = %err.kind(),
                    error = %err,
                    "Transition rejected"
                );
                Err(err)
            }
        }
    }

    fn try_process(&mut self, tx: &SignedTransaction) -> Result<Receipt> {
        let message = tx.message()?;
        let id = tx.id()?;
        self.replay.check(&id, tx.nonce)?;
        let mut signers = SignerSet::verify(&message, &tx.signatures)?;
        tracing::debug!(tx = %id, signers = signers.len(), "Signatures verified");

        let mut uow = self.ledger.begin(tx.instruction.accounts());
        let body = {
            let mut ctx = Context {
                uow: &mut uow,
                signers: &mut signers,
                program_id: &self.config.program_id,
                metadata: &self.metadata,
            };
            handlers::dispatch(&mut ctx, &tx.instruction)?
        };
        let receipt = Receipt::issue(id, body)?;
        uow.commit()?;

        self.replay.mark(id, tx.nonce);
        self.journal.append(receipt.clone());
        Ok(receipt)
    }
}
