//! Error types for the Haus auction house.
//!
//! All errors use the `AH_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Derivation errors
//! - 2xx: Record errors
//! - 3xx: Authorization errors
//! - 4xx: Funds errors
//! - 5xx: Configuration errors
//! - 6xx: Asset custody errors
//! - 9xx: General / internal errors
//!
//! Every variant maps onto an [`ErrorKind`]; callers decide whether to
//! resubmit based on the kind, the engine never retries on its own.

use thiserror::Error;

use crate::Address;

/// Coarse failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DerivationMismatch,
    DuplicateRecord,
    NotFound,
    Unauthorized,
    InsufficientFunds,
    InvalidConfiguration,
    /// An account of the wrong shape was supplied.
    InvalidAccount,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DerivationMismatch => write!(f, "DERIVATION_MISMATCH"),
            Self::DuplicateRecord => write!(f, "DUPLICATE_RECORD"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::InsufficientFunds => write!(f, "INSUFFICIENT_FUNDS"),
            Self::InvalidConfiguration => write!(f, "INVALID_CONFIGURATION"),
            Self::InvalidAccount => write!(f, "INVALID_ACCOUNT"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all Haus operations.
#[derive(Debug, Error)]
pub enum HausError {
    // =================================================================
    // Derivation Errors (1xx)
    // =================================================================
    /// The supplied address/bump does not match the recomputed derivation.
    #[error("AH_ERR_100: Derived key invalid for {account}: expected {expected}, recomputed {actual}")]
    DerivationMismatch {
        account: &'static str,
        expected: Address,
        actual: Address,
    },

    /// Seeds are malformed or land on the curve.
    #[error("AH_ERR_101: Invalid seeds: {reason}")]
    InvalidSeeds { reason: String },

    /// No bump in 0..=255 produced an off-curve address.
    #[error("AH_ERR_102: Unable to find a viable bump seed")]
    NoViableBump,

    // =================================================================
    // Record Errors (2xx)
    // =================================================================
    /// A live record already occupies this address.
    #[error("AH_ERR_200: {account} already exists at {address}")]
    DuplicateRecord {
        account: &'static str,
        address: Address,
    },

    /// No record exists at this address.
    #[error("AH_ERR_201: {account} does not exist at {address}")]
    NotFound {
        account: &'static str,
        address: Address,
    },

    /// The account exists but holds a different record type.
    #[error("AH_ERR_202: Account {address} is not a {expected}")]
    WrongAccountType {
        address: Address,
        expected: &'static str,
    },

    /// A transition touched an account it did not declare up front.
    #[error("AH_ERR_203: Account {0} was not declared by this transition")]
    AccountNotDeclared(Address),

    /// Two accounts that must match do not.
    #[error("AH_ERR_204: Public key mismatch for {account}: expected {expected}, got {actual}")]
    PublicKeyMismatch {
        account: &'static str,
        expected: Address,
        actual: Address,
    },

    // =================================================================
    // Authorization Errors (3xx)
    // =================================================================
    /// The required party did not sign.
    #[error("AH_ERR_300: Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// The house requires sign-off and the authority did not co-sign.
    #[error("AH_ERR_301: Cannot take this action without auction house signing too")]
    MissingSignOff,

    /// A free or zero-price sale was matched without the authority or seller.
    #[error("AH_ERR_302: Cannot match free sales unless the auction house or seller signs off")]
    FreeSaleRequiresSignOff,

    /// A signature did not verify.
    #[error("AH_ERR_303: Signature verification failed for {0}")]
    InvalidSignature(Address),

    /// The same signed transaction was already committed.
    #[error("AH_ERR_304: Transaction already processed: {0}")]
    TransactionReplayed(crate::TransactionId),

    /// The nonce is at or below the floor left by evicted transactions.
    #[error("AH_ERR_305: Transaction nonce {nonce} is stale, must exceed {floor}")]
    StaleNonce { nonce: u64, floor: u64 },

    // =================================================================
    // Funds Errors (4xx)
    // =================================================================
    /// Balance too low for the requested movement.
    #[error("AH_ERR_400: Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// Arithmetic overflowed while computing a balance or fee.
    #[error("AH_ERR_401: Numerical overflow")]
    NumericalOverflow,

    // =================================================================
    // Configuration Errors (5xx)
    // =================================================================
    /// Fee basis points above 10 000.
    #[error("AH_ERR_500: BP must be less than or equal to 10000, got {0}")]
    InvalidBasisPoints(u16),

    /// Any other invalid marketplace or engine configuration.
    #[error("AH_ERR_501: Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // Asset Custody Errors (6xx)
    // =================================================================
    /// A token account failed an ownership, mint or delegate check.
    #[error("AH_ERR_600: Invalid token account {address}: {reason}")]
    InvalidTokenAccount { address: Address, reason: String },

    /// The asset mint has no metadata descriptor.
    #[error("AH_ERR_601: Metadata doesn't exist for mint {0}")]
    MetadataNotFound(Address),

    /// Requested quantity exceeds what the token account holds.
    #[error("AH_ERR_602: Invalid token amount: need {needed}, account holds {held}")]
    InvalidTokenAmount { needed: u64, held: u64 },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Lamport or token totals changed across a transition.
    #[error("AH_ERR_900: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    /// Serialization / deserialization error.
    #[error("AH_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Unrecoverable internal error.
    #[error("AH_ERR_902: Internal error: {0}")]
    Internal(String),
}

impl HausError {
    /// The failure class of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DerivationMismatch { .. } | Self::InvalidSeeds { .. } | Self::NoViableBump => {
                ErrorKind::DerivationMismatch
            }
            Self::DuplicateRecord { .. }
            | Self::TransactionReplayed(_)
            | Self::StaleNonce { .. } => ErrorKind::DuplicateRecord,
            Self::NotFound { .. } | Self::MetadataNotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized { .. }
            | Self::MissingSignOff
            | Self::FreeSaleRequiresSignOff
            | Self::InvalidSignature(_)
            | Self::InvalidTokenAccount { .. }
            | Self::InvalidTokenAmount { .. } => ErrorKind::Unauthorized,
            Self::InsufficientFunds { .. } | Self::NumericalOverflow => {
                ErrorKind::InsufficientFunds
            }
            Self::InvalidBasisPoints(_) | Self::Configuration(_) => {
                ErrorKind::InvalidConfiguration
            }
            Self::WrongAccountType { .. }
            | Self::AccountNotDeclared(_)
            | Self::PublicKeyMismatch { .. } => ErrorKind::InvalidAccount,
            Self::SupplyInvariantViolation { .. } | Self::Serialization(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Shorthand for an `Unauthorized` error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, HausError>;

impl From<serde_json::Error> for HausError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
