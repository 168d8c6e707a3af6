//! The marketplace-wide program signer.
//!
//! A derived address with no private key. Sellers delegate their asset to
//! it when listing; only the execute-sale handler may act as it, by
//! presenting its seeds to the transaction's [`SignerSet`].

use haus_ledger::SignerSet;
use haus_types::{seeds, verify_canonical_address, verify_program_address, Address, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProgramSigner {
    address: Address,
    bump: u8,
}

impl ProgramSigner {
    /// Check a client-supplied `(address, bump)`.
    pub(crate) fn verify(program_id: &Address, address: Address, bump: u8) -> Result<Self> {
        verify_program_address(
            "program_as_signer",
            &seeds::program_signer(),
            bump,
            program_id,
            &address,
        )?;
        Ok(Self { address, bump })
    }

    /// Like [`ProgramSigner::verify`], insisting on the canonical bump.
    pub(crate) fn verify_canonical(program_id: &Address, address: Address, bump: u8) -> Result<Self> {
        verify_canonical_address(
            "program_as_signer",
            &seeds::program_signer(),
            bump,
            program_id,
            &address,
        )?;
        Ok(Self { address, bump })
    }

    pub(crate) fn address(&self) -> Address {
        self.address
    }

    /// Add the program signer to `signers` for the rest of the transaction.
    pub(crate) fn authorize(&self, signers: &mut SignerSet, program_id: &Address) -> Result<Address> {
        signers.sign_with_seeds(&seeds::program_signer(), self.bump, program_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pda::find_program_as_signer_address;
    use haus_types::{constants::DEFAULT_PROGRAM_ID, HausError};

    #[test]
    fn authorize_adds_signer() {
        let (address, bump) = find_program_as_signer_address(&DEFAULT_PROGRAM_ID).unwrap();
        let signer = ProgramSigner::verify_canonical(&DEFAULT_PROGRAM_ID, address, bump).unwrap();
        let mut signers = SignerSet::default();
        assert_eq!(signer.authorize(&mut signers, &DEFAULT_PROGRAM_ID).unwrap(), address);
        assert!(signers.contains(&signer.address()));
    }

    #[test]
    fn impostor_address_rejected() {
        let (_, bump) = find_program_as_signer_address(&DEFAULT_PROGRAM_ID).unwrap();
        let err = ProgramSigner::verify(&DEFAULT_PROGRAM_ID, Address([1u8; 32]), bump).unwrap_err();
        assert!(matches!(err, HausError::DerivationMismatch { .. }));
    }
}
