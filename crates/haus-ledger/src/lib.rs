//! # haus-ledger
//!
//! The state the auction house runs against.
//!
//! - [`Ledger`]: ordered account store with genesis helpers
//! - [`UnitOfWork`]: snapshot, stage and commit one transition atomically
//! - [`TokenAccount`]: asset and currency custody with delegation
//! - [`Keypair`], [`SignerSet`]: ed25519 identities and signer verification
//!
//! ## Atomicity
//!
//! ```text
//! Ledger::begin(declared) ──▶ stage reads/writes ──▶ commit()
//!                                      │                 │
//!                                      ▼                 ▼
//!                              drop = discard    conservation check,
//!                                                then apply all
//! ```

pub mod account;
pub mod signature;
pub mod store;
pub mod token;
pub mod unit_of_work;

pub use account::{Account, AccountData};
pub use signature::{Keypair, SignerSet, TransactionSignature};
pub use store::Ledger;
pub use token::TokenAccount;
pub use unit_of_work::UnitOfWork;
