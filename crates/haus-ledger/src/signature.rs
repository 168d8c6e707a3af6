//! ed25519 identities and signer verification.
//!
//! A [`SignerSet`] is built once per transaction from verified signatures
//! and is the only thing handlers consult for authorization. Derived
//! addresses have no private key; they enter a set only through
//! [`SignerSet::sign_with_seeds`], which re-derives them from their seeds.

use std::collections::BTreeSet;
use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use haus_types::{create_program_address, Address, HausError, Result};
use serde::{Deserialize, Serialize};

/// One party's signature over a transaction message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub signer: Address,
    /// 64-byte ed25519 signature.
    pub signature: Vec<u8>,
}

/// A wallet keypair.
pub struct Keypair(SigningKey);

impl Keypair {
    /// Deterministic keypair from a 32-byte secret.
    #[must_use]
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self(SigningKey::from_bytes(&seed))
    }

    /// The wallet address (public key).
    #[must_use]
    pub fn address(&self) -> Address {
        Address(self.0.verifying_key().to_bytes())
    }

    #[must_use]
    pub fn sign(&self, message: &[u8]) -> TransactionSignature {
        TransactionSignature {
            signer: self.address(),
            signature: self.0.sign(message).to_bytes().to_vec(),
        }
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Keypair {
    /// Fresh random keypair.
    #[must_use]
    pub fn generate() -> Self {
        Self(SigningKey::generate(&mut rand::rngs::OsRng))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keypair").field(&self.address()).finish()
    }
}

fn verify_one(message: &[u8], entry: &TransactionSignature) -> Result<()> {
    let invalid = || HausError::InvalidSignature(entry.signer);
    let key = VerifyingKey::from_bytes(entry.signer.as_bytes()).map_err(|_| invalid())?;
    let signature = Signature::from_slice(&entry.signature).map_err(|_| invalid())?;
    key.verify_strict(message, &signature).map_err(|_| invalid())
}

/// The identities that authorized the current transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerSet {
    signers: BTreeSet<Address>,
}

impl SignerSet {
    /// Verify every signature over `message`.
    ///
    /// # Errors
    /// Returns `InvalidSignature` naming the first signer whose signature
    /// does not verify.
    pub fn verify(message: &[u8], signatures: &[TransactionSignature]) -> Result<Self> {
        let mut signers = BTreeSet::new();
        for entry in signatures {
            verify_one(message, entry)?;
            signers.insert(entry.signer);
        }
        Ok(Self { signers })
    }

    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.signers.contains(address)
    }

    /// Fail with `Unauthorized` unless `address` signed.
    pub fn require(&self, address: &Address, role: &str) -> Result<()> {
        if !self.contains(address) {
            return Err(HausError::unauthorized(format!(
                "{role} {} did not sign",
                address.short()
            )));
        }
        Ok(())
    }

    /// Add the derived address for `(seeds, bump)` under `program_id`.
    pub fn sign_with_seeds(
        &mut self,
        seeds: &[&[u8]],
        bump: u8,
        program_id: &Address,
    ) -> Result<Address> {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);
        let address = create_program_address(&with_bump, program_id)?;
        self.signers.insert(address);
        Ok(address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.signers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl SignerSet {
    /// A set trusted without signatures, for handler-level tests.
    pub fn trusted(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self {
            signers: addresses.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haus_types::{constants, find_program_address, is_on_curve};

    #[test]
    fn valid_signatures_verify() {
        let alice = Keypair::generate();
        let bob = Keypair::generate();
        let msg = b"haus:tx:v1:hello";
        let set = SignerSet::verify(msg, &[alice.sign(msg), bob.sign(msg)]).unwrap();
        assert!(set.contains(&alice.address()));
        assert!(set.contains(&bob.address()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn signature_over_other_message_rejected() {
        let alice = Keypair::generate();
        let sig = alice.sign(b"one");
        let err = SignerSet::verify(b"two", &[sig]).unwrap_err();
        assert!(matches!(err, HausError::InvalidSignature(a) if a == alice.address()));
    }

    #[test]
    fn claimed_signer_must_match_key() {
        let alice = Keypair::generate();
        let mallory = Keypair::generate();
        let mut sig = mallory.sign(b"msg");
        sig.signer = alice.address();
        assert!(SignerSet::verify(b"msg", &[sig]).is_err());
    }

    #[test]
    fn truncated_signature_rejected() {
        let alice = Keypair::generate();
        let mut sig = alice.sign(b"msg");
        sig.signature.truncate(10);
        assert!(SignerSet::verify(b"msg", &[sig]).is_err());
    }

    #[test]
    fn require_reports_role() {
        let set = SignerSet::default();
        let err = set.require(&Address([1u8; 32]), "authority").unwrap_err();
        assert!(format!("{err}").contains("authority"));
    }

    #[test]
    fn seeds_add_derived_signer() {
        let program = constants::DEFAULT_PROGRAM_ID;
        let seeds: &[&[u8]] = &[constants::PREFIX, constants::SIGNER];
        let (expected, bump) = find_program_address(seeds, &program).unwrap();
        let mut set = SignerSet::default();
        let added = set.sign_with_seeds(seeds, bump, &program).unwrap();
        assert_eq!(added, expected);
        assert!(set.contains(&expected));
        assert!(!is_on_curve(expected.as_bytes()));
    }

    #[test]
    fn deterministic_keypair() {
        let a = Keypair::from_seed([4u8; 32]);
        let b = Keypair::from_seed([4u8; 32]);
        assert_eq!(a.address(), b.address());
        assert!(is_on_curve(a.address().as_bytes()));
    }
}
