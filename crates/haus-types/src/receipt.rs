//! Receipts for the Haus audit trail.
//!
//! Every committed transition produces a [`Receipt`]. Receipts are
//! append-only and carry a SHA-256 hash of their body so an exported trail
//! can be checked independently.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{Address, Result, TransactionId};

/// Time-ordered receipt identifier (UUIDv7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ReceiptId(pub Uuid);

impl ReceiptId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.0)
    }
}

/// The transition a receipt proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptKind {
    AuctionHouseCreated,
    AuctionHouseUpdated,
    Deposit,
    Withdraw,
    Listing,
    ListingCancelled,
    Bid,
    BidCancelled,
    Purchase,
    FeeWithdrawal,
    TreasuryWithdrawal,
}

impl fmt::Display for ReceiptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuctionHouseCreated => write!(f, "AUCTION_HOUSE_CREATED"),
            Self::AuctionHouseUpdated => write!(f, "AUCTION_HOUSE_UPDATED"),
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdraw => write!(f, "WITHDRAW"),
            Self::Listing => write!(f, "LISTING"),
            Self::ListingCancelled => write!(f, "LISTING_CANCELLED"),
            Self::Bid => write!(f, "BID"),
            Self::BidCancelled => write!(f, "BID_CANCELLED"),
            Self::Purchase => write!(f, "PURCHASE"),
            Self::FeeWithdrawal => write!(f, "FEE_WITHDRAWAL"),
            Self::TreasuryWithdrawal => write!(f, "TREASURY_WITHDRAWAL"),
        }
    }
}

/// What happened, independent of when and under which id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptBody {
    pub kind: ReceiptKind,
    pub auction_house: Address,
    /// The acting wallet: seller, buyer, depositor or authority.
    pub wallet: Address,
    /// The other party of a purchase (the seller).
    pub counterparty: Option<Address>,
    pub trade_state: Option<Address>,
    pub token_mint: Option<Address>,
    /// Price for orders, amount for fund movements.
    pub amount: u64,
    pub token_size: u64,
    /// Marketplace fee taken by a purchase.
    pub fee: u64,
}

impl ReceiptBody {
    /// A body with no order fields set.
    #[must_use]
    pub fn new(kind: ReceiptKind, auction_house: Address, wallet: Address) -> Self {
        Self {
            kind,
            auction_house,
            wallet,
            counterparty: None,
            trade_state: None,
            token_mint: None,
            amount: 0,
            token_size: 0,
            fee: 0,
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    #[must_use]
    pub fn with_order(
        mut self,
        trade_state: Address,
        token_mint: Address,
        price: u64,
        token_size: u64,
    ) -> Self {
        self.trade_state = Some(trade_state);
        self.token_mint = Some(token_mint);
        self.amount = price;
        self.token_size = token_size;
        self
    }

    /// SHA-256 over the canonical JSON encoding.
    pub fn hash(&self) -> Result<[u8; 32]> {
        let bytes = serde_json::to_vec(self)?;
        Ok(Sha256::digest(bytes).into())
    }
}

/// A committed transition, as recorded in the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub transaction_id: TransactionId,
    pub body: ReceiptBody,
    /// SHA-256 hash of `body`.
    pub payload_hash: [u8; 32],
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    pub fn issue(transaction_id: TransactionId, body: ReceiptBody) -> Result<Self> {
        let payload_hash = body.hash()?;
        Ok(Self {
            id: ReceiptId::new(),
            transaction_id,
            body,
            payload_hash,
            issued_at: Utc::now(),
        })
    }

    /// Recompute the body hash and compare.
    #[must_use]
    pub fn verify(&self) -> bool {
        self.body.hash().is_ok_and(|h| h == self.payload_hash)
    }

    #[must_use]
    pub fn kind(&self) -> ReceiptKind {
        self.body.kind
    }
}
