//! Append-only receipt journal.

use std::collections::BTreeMap;

use haus_types::{Address, Receipt, ReceiptKind};

#[derive(Debug, Default)]
pub struct Journal {
    receipts: Vec<Receipt>,
    /// Trade-state address → indices into `receipts`.
    by_trade_state: BTreeMap<Address, Vec<usize>>,
}

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, receipt: Receipt) {
        if let Some(trade_state) = receipt.body.trade_state {
            self.by_trade_state
                .entry(trade_state)
                .or_default()
                .push(self.receipts.len());
        }
        self.receipts.push(receipt);
    }

    /// Receipts that reference `trade_state`, oldest first.
    pub fn for_trade_state(&self, trade_state: &Address) -> impl Iterator<Item = &Receipt> {
        self.by_trade_state
            .get(trade_state)
            .into_iter()
            .flatten()
            .filter_map(|&i| self.receipts.get(i))
    }

    pub fn of_kind(&self, kind: ReceiptKind) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter().filter(move |r| r.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Receipt> {
        self.receipts.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haus_types::{ReceiptBody, TransactionId};

    fn receipt(kind: ReceiptKind, trade_state: Option<Address>) -> Receipt {
        let mut body = ReceiptBody::new(kind, Address([1u8; 32]), Address([2u8; 32]));
        body.trade_state = trade_state;
        Receipt::issue(TransactionId([0u8; 32]), body).unwrap()
    }

    #[test]
    fn indexes_by_trade_state() {
        let listing = Address([5u8; 32]);
        let mut journal = Journal::new();
        journal.append(receipt(ReceiptKind::Deposit, None));
        journal.append(receipt(ReceiptKind::Listing, Some(listing)));
        journal.append(receipt(ReceiptKind::ListingCancelled, Some(listing)));

        let kinds: Vec<_> = journal.for_trade_state(&listing).map(Receipt::kind).collect();
        assert_eq!(kinds, vec![ReceiptKind::Listing, ReceiptKind::ListingCancelled]);
        assert_eq!(journal.of_kind(ReceiptKind::Deposit).count(), 1);
        assert_eq!(journal.len(), 3);
        assert_eq!(journal.for_trade_state(&Address([6u8; 32])).count(), 0);
    }
}
