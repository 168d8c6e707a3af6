//! Deterministic address derivation.
//!
//! A derived address is `SHA-256(seeds.. || bump || namespace || marker)`,
//! accepted only when the digest is **not** a valid ed25519 point. Nobody
//! can hold a private key for such an address, so the only way to act as it
//! is to present its seeds to the owning program.
//!
//! [`find_program_address`] walks bumps from 255 downwards and returns the
//! first viable one, the *canonical* bump. Callers store that bump and pass
//! it back on every transition; [`verify_program_address`] re-hashes once
//! instead of searching again.

use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};

use crate::{constants, Address, HausError, Result};

/// Whether `bytes` decompresses to a point on the ed25519 curve.
#[must_use]
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

fn check_seeds(seeds: &[&[u8]]) -> Result<()> {
    if seeds.len() > constants::MAX_SEEDS {
        return Err(HausError::InvalidSeeds {
            reason: format!("{} seeds exceeds max {}", seeds.len(), constants::MAX_SEEDS),
        });
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > constants::MAX_SEED_LEN) {
        return Err(HausError::InvalidSeeds {
            reason: format!(
                "seed of {} bytes exceeds max {}",
                seed.len(),
                constants::MAX_SEED_LEN
            ),
        });
    }
    Ok(())
}

fn derive_digest(seeds: &[&[u8]], program_id: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(constants::DERIVATION_MARKER);
    hasher.finalize().into()
}

/// Hash `seeds` under `program_id` into a derived address.
///
/// # Errors
/// - `InvalidSeeds` if there are too many seeds or one is too long
/// - `InvalidSeeds` if the digest lands on the curve
pub fn create_program_address(seeds: &[&[u8]], program_id: &Address) -> Result<Address> {
    check_seeds(seeds)?;
    let digest = derive_digest(seeds, program_id);
    if is_on_curve(&digest) {
        return Err(HausError::InvalidSeeds {
            reason: "derived address lies on the ed25519 curve".into(),
        });
    }
    Ok(Address(digest))
}

/// Find the canonical (highest viable) bump for `seeds`.
///
/// # Errors
/// Returns `NoViableBump` if none of the 256 bumps yields an off-curve
/// address, or `InvalidSeeds` if the seeds themselves are malformed.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Address) -> Result<(Address, u8)> {
    if seeds.len() >= constants::MAX_SEEDS {
        return Err(HausError::InvalidSeeds {
            reason: format!("{} seeds leaves no room for a bump", seeds.len()),
        });
    }
    check_seeds(seeds)?;

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = seeds.to_vec();
        with_bump.push(&bump_seed);
        let digest = derive_digest(&with_bump, program_id);
        if !is_on_curve(&digest) {
            return Ok((Address(digest), bump));
        }
    }
    Err(HausError::NoViableBump)
}

/// Check that `(seeds, bump)` hashes to `expected`.
///
/// `account` names the record in the error so a mismatch is attributable.
///
/// # Errors
/// Returns `DerivationMismatch` when the recomputed address differs or the
/// bump is not viable.
pub fn verify_program_address(
    account: &'static str,
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
    expected: &Address,
) -> Result<()> {
    let bump_seed = [bump];
    let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
    with_bump.extend_from_slice(seeds);
    with_bump.push(&bump_seed);

    match create_program_address(&with_bump, program_id) {
        Ok(actual) if actual == *expected => Ok(()),
        Ok(actual) => Err(HausError::DerivationMismatch {
            account,
            expected: *expected,
            actual,
        }),
        Err(_) => Err(HausError::DerivationMismatch {
            account,
            expected: *expected,
            actual: Address::ZERO,
        }),
    }
}

/// Like [`verify_program_address`], but also insists on the canonical bump.
///
/// Used whenever a record is about to be created, so that one tuple can
/// never be materialized at two addresses.
pub fn verify_canonical_address(
    account: &'static str,
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
    expected: &Address,
) -> Result<()> {
    let (canonical, canonical_bump) = find_program_address(seeds, program_id)?;
    if canonical_bump != bump || canonical != *expected {
        return Err(HausError::DerivationMismatch {
            account,
            expected: *expected,
            actual: canonical,
        });
    }
    Ok(())
}
