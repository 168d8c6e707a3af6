//! Replay guard: a committed transaction cannot land twice.
//!
//! Keeps a bounded window of committed [`TransactionId`]s. When the window
//! is full the oldest entry is evicted and its nonce raises a floor; any
//! transaction whose nonce is at or below the floor is rejected as stale.
//! An evicted id therefore stays unreplayable without being remembered.
//!
//! Ids are only recorded after a successful commit, so an aborted
//! transaction may be resubmitted unchanged.

use std::collections::{HashSet, VecDeque};

use haus_types::{HausError, Result, TransactionId};

#[derive(Debug)]
pub struct ReplayGuard {
    /// Ids of committed transactions still inside the window.
    seen: HashSet<TransactionId>,
    /// Insertion order for eviction (front = oldest).
    order: VecDeque<(TransactionId, u64)>,
    /// Highest nonce of any evicted transaction.
    floor: Option<u64>,
    max_size: usize,
}

impl ReplayGuard {
    /// A zero `max_size` is treated as one.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            seen: HashSet::with_capacity(max_size.min(1024)),
            order: VecDeque::with_capacity(max_size.min(1024)),
            floor: None,
            max_size,
        }
    }

    /// # Errors
    /// [`HausError::TransactionReplayed`] if `id` is in the window,
    /// [`HausError::StaleNonce`] if `nonce` does not exceed the floor.
    pub fn check(&self, id: &TransactionId, nonce: u64) -> Result<()> {
        if self.seen.contains(id) {
            return Err(HausError::TransactionReplayed(*id));
        }
        if let Some(floor) = self.floor {
            if nonce <= floor {
                return Err(HausError::StaleNonce { nonce, floor });
            }
        }
        Ok(())
    }

    /// Record a committed transaction.
    pub fn mark(&mut self, id: TransactionId, nonce: u64) {
        if !self.seen.insert(id) {
            return;
        }
        if self.order.len() >= self.max_size {
            if let Some((oldest, oldest_nonce)) = self.order.pop_front() {
                self.seen.remove(&oldest);
                self.floor = Some(self.floor.map_or(oldest_nonce, |f| f.max(oldest_nonce)));
            }
        }
        self.order.push_back((id, nonce));
    }

    #[must_use]
    pub fn is_processed(&self, id: &TransactionId) -> bool {
        self.seen.contains(id)
    }

    /// Nonces at or below this value are rejected.
    #[must_use]
    pub fn floor(&self) -> Option<u64> {
        self.floor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
