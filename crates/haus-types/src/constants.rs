//! Protocol-wide constants: derivation seeds, record sizes, limits.

use crate::Address;

/// Seed prefix shared by every derived record.
pub const PREFIX: &[u8] = b"auction_house";

/// Seed suffix of the fee account.
pub const FEE_PAYER: &[u8] = b"fee_payer";

/// Seed suffix of the treasury account.
pub const TREASURY: &[u8] = b"treasury";

/// Seed of the marketplace-wide program signer.
pub const SIGNER: &[u8] = b"signer";

/// Domain marker appended to every derivation hash.
pub const DERIVATION_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Domain tag prefixed to every signed transaction message.
pub const TRANSACTION_DOMAIN: &[u8] = b"haus:tx:v1:";

/// Maximum number of seed components (bump included).
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed component.
pub const MAX_SEED_LEN: usize = 32;

/// Fee rates are expressed in basis points of this denominator.
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Upper bound for `seller_fee_basis_points`.
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// The native settlement currency descriptor.
pub const NATIVE_MINT: Address = Address([
    6, 155, 136, 87, 254, 171, 129, 132, 251, 104, 127, 99, 70, 24, 192, 53, 218, 196, 57, 220,
    26, 235, 59, 85, 152, 160, 240, 0, 0, 0, 0, 1,
]);

/// Default derivation namespace of the auction-house program.
pub const DEFAULT_PROGRAM_ID: Address = Address([
    0x0a, 0x7e, 0x54, 0x1c, 0x3f, 0x2b, 0x9d, 0x61, 0x48, 0xe2, 0x05, 0xbb, 0x7a, 0x90, 0x13, 0xc4,
    0x66, 0xd1, 0x2f, 0x38, 0x8e, 0x4a, 0xf7, 0x0c, 0x92, 0x5d, 0x31, 0xa8, 0xe6, 0x17, 0xb3, 0x4f,
]);

/// Fixed per-account storage overhead charged by the rent schedule.
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

/// Default rent rate (lamports per byte-year).
pub const DEFAULT_LAMPORTS_PER_BYTE_YEAR: u64 = 3480;

/// Default number of years of rent an account must hold to stay alive.
pub const DEFAULT_EXEMPTION_THRESHOLD: u64 = 2;

/// Default number of committed transaction ids remembered by the replay guard.
pub const DEFAULT_REPLAY_CACHE_SIZE: usize = 100_000;

/// Serialized size of a trade state: bump + side.
pub const TRADE_STATE_SIZE: usize = 2;

pub const AUCTION_HOUSE_SIZE: usize = 8 +                   // discriminator
32 +                                                        // fee account
32 +                                                        // treasury
32 +                                                        // treasury withdrawal destination
32 +                                                        // fee withdrawal destination
32 +                                                        // currency mint
32 +                                                        // authority
32 +                                                        // creator
1 +                                                         // bump
1 +                                                         // treasury bump
1 +                                                         // fee account bump
2 +                                                         // seller fee basis points
1 +                                                         // requires sign off
1 +                                                         // can change sale price
64                                                          // padding
;

pub const VAULT_SIZE: usize = 8 +                           // discriminator
1 +                                                         // role
32 +                                                        // auction house
32 +                                                        // escrow wallet (zeroed for fee/treasury)
32 +                                                        // currency mint
1 +                                                         // bump
8 +                                                         // token balance
8                                                           // committed to open bids
;

/// Serialized size of an asset/currency token account.
pub const TOKEN_ACCOUNT_SIZE: usize = 165;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
