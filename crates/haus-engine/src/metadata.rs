//! Asset metadata collaborator.
//!
//! The engine only asks whether a descriptor exists for a mint. Names,
//! creators and royalty rates are carried for callers and never
//! interpreted here.

use std::collections::BTreeMap;

use haus_types::Address;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub address: Address,
    pub verified: bool,
    /// Percentage of royalties, summing to 100 across creators.
    pub share: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub mint: Address,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Creator royalty rate. Opaque to the engine.
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
}

/// Read-only lookup of asset descriptors by mint.
pub trait MetadataProvider {
    fn metadata(&self, mint: &Address) -> Option<&AssetMetadata>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadata {
    by_mint: BTreeMap<Address, AssetMetadata>,
}

impl InMemoryMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one for the mint.
    pub fn insert(&mut self, metadata: AssetMetadata) -> Option<AssetMetadata> {
        self.by_mint.insert(metadata.mint, metadata)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_mint.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_mint.is_empty()
    }
}

impl MetadataProvider for InMemoryMetadata {
    fn metadata(&self, mint: &Address) -> Option<&AssetMetadata> {
        self.by_mint.get(mint)
    }
}
