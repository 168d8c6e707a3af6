//! # haus-types
//!
//! Shared records, derivation and errors for the **Haus** auction house.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identities**: [`Address`], [`TransactionId`]
//! - **Derivation**: [`find_program_address`], [`verify_program_address`] and the seed tuples in [`seeds`]
//! - **Records**: [`AuctionHouse`], [`TradeState`], [`Vault`]
//! - **Receipts**: [`Receipt`], [`ReceiptKind`], [`ReceiptBody`]
//! - **Configuration**: [`EngineConfig`], [`Rent`]
//! - **Errors**: [`HausError`] with `AH_ERR_` prefix codes
//! - **Constants**: seeds, sizes and limits

pub mod address;
pub mod auction_house;
pub mod config;
pub mod constants;
pub mod derivation;
pub mod error;
pub mod receipt;
pub mod seeds;
pub mod trade_state;
pub mod vault;

// Re-export all primary types at crate root for ergonomic imports:
//   use haus_types::{Address, AuctionHouse, HausError, ...};

pub use address::*;
pub use auction_house::*;
pub use config::*;
pub use derivation::*;
pub use error::*;
pub use receipt::*;
pub use seeds::TradeStateSeeds;
pub use trade_state::*;
pub use vault::*;

// Constants are accessed via `haus_types::constants::FOO`
// and seed tuples via `haus_types::seeds::escrow(..)`.
