//! # haus-engine
//!
//! The auction-house transition engine.
//!
//! A house is a derived config record owned by an authority. Sellers post
//! listings by delegating their asset to the program signer; buyers post
//! bids backed by a per-house escrow. `execute_sale` swaps asset for
//! escrowed currency atomically, paying the house fee on the way.
//!
//! ## Flow
//!
//! ```text
//!   client ──▶ SignedTransaction ──▶ AuctionHouseEngine::process
//!                                        │
//!                    ┌───────────────────┼────────────────────┐
//!                    ▼                   ▼                    ▼
//!              ReplayGuard         handlers (UoW)          Journal
//!            (no double apply)   create/sell/buy/...    (receipt trail)
//! ```
//!
//! - [`AuctionHouseEngine`]: replay check, signatures, dispatch, commit
//! - [`AuctionHouseClient`]: derives addresses and builds instructions
//! - [`pda`]: one `find_*` helper per derived record
//! - [`MetadataProvider`]: asset descriptor lookup

pub mod client;
pub mod engine;
mod handlers;
pub mod instruction;
pub mod journal;
pub mod metadata;
pub mod pda;
pub(crate) mod program_signer;
pub mod replay;

pub use client::{AuctionHouseClient, HouseSettings, OrderTerms, Sale};
pub use engine::AuctionHouseEngine;
pub use instruction::{Instruction, SignedTransaction};
pub use journal::Journal;
pub use metadata::{AssetMetadata, Creator, InMemoryMetadata, MetadataProvider};
pub use replay::ReplayGuard;
