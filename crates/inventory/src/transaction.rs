//! Stock movements and the append-only log that records them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use storehouse_core::{DomainError, DomainResult, Entity, TransactionId};

use crate::item::Item;
use crate::storage::Storage;
use crate::timestamp::parse_timestamp;
use crate::unit::UnitOfMeasure;

/// Direction of a movement, derived from the quantity sign.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Inflow,
    Outflow,
}

/// One signed stock movement (positive = receipt, negative = issue).
///
/// References are already resolved; the quantity is expressed in `unit`,
/// which need not be the item's own unit.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    item: Arc<Item>,
    unit: Arc<UnitOfMeasure>,
    storage: Arc<Storage>,
    quantity: Decimal,
    occurred_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        item: Arc<Item>,
        unit: Arc<UnitOfMeasure>,
        storage: Arc<Storage>,
        quantity: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity.is_zero() {
            return Err(DomainError::validation("quantity cannot be zero"));
        }
        Ok(Self {
            id: TransactionId::new(),
            item,
            unit,
            storage,
            quantity,
            occurred_at,
        })
    }

    /// Same as [`Transaction::new`] with a `YYYY-MM-DD HH:MM:SS` timestamp.
    pub fn at(
        item: Arc<Item>,
        unit: Arc<UnitOfMeasure>,
        storage: Arc<Storage>,
        quantity: Decimal,
        occurred_at: &str,
    ) -> DomainResult<Self> {
        Self::new(item, unit, storage, quantity, parse_timestamp(occurred_at)?)
    }

    /// Receipt of `quantity` of the item in its own unit.
    pub fn receipt(
        item: &Arc<Item>,
        storage: &Arc<Storage>,
        quantity: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::new(
            Arc::clone(item),
            Arc::clone(item.unit()),
            Arc::clone(storage),
            quantity.abs(),
            occurred_at,
        )
    }

    /// Issue of `quantity` of the item in its own unit.
    pub fn issue(
        item: &Arc<Item>,
        storage: &Arc<Storage>,
        quantity: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::new(
            Arc::clone(item),
            Arc::clone(item.unit()),
            Arc::clone(storage),
            -quantity.abs(),
            occurred_at,
        )
    }

    pub fn item(&self) -> &Arc<Item> {
        &self.item
    }

    pub fn unit(&self) -> &Arc<UnitOfMeasure> {
        &self.unit
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn direction(&self) -> Direction {
        if self.quantity.is_sign_negative() {
            Direction::Outflow
        } else {
            Direction::Inflow
        }
    }
}

impl Entity for Transaction {
    type Id = TransactionId;

    fn id(&self) -> TransactionId {
        self.id
    }
}

/// A transaction together with the position the log assigned to it.
#[derive(Debug, Clone)]
struct RecordedTransaction {
    sequence_number: u64,
    transaction: Transaction,
}

/// Append-only, ordered transaction log.
///
/// Sequence numbers start at 1 and increase by one per append. Recorded
/// transactions are never modified or removed.
#[derive(Debug, Clone, Default)]
pub struct TransactionLog {
    entries: Vec<RecordedTransaction>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one transaction, returning its sequence number.
    pub fn append(&mut self, transaction: Transaction) -> u64 {
        let sequence_number = self.entries.len() as u64 + 1;
        tracing::debug!(
            sequence_number,
            transaction_id = %transaction.id,
            item = %transaction.item.name(),
            storage = %transaction.storage.code(),
            quantity = %transaction.quantity,
            "transaction recorded"
        );
        self.entries.push(RecordedTransaction {
            sequence_number,
            transaction,
        });
        sequence_number
    }

    /// Look up a transaction by its sequence number.
    pub fn get(&self, sequence_number: u64) -> Option<&Transaction> {
        let idx = usize::try_from(sequence_number.checked_sub(1)?).ok()?;
        self.entries.get(idx).map(|e| &e.transaction)
    }

    /// Last assigned sequence number (0 when empty).
    pub fn last_sequence_number(&self) -> u64 {
        self.entries.last().map(|e| e.sequence_number).unwrap_or(0)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Transactions recorded at `storage`, in log order.
    pub fn at_storage<'a>(&'a self, storage: &'a Storage) -> impl Iterator<Item = &'a Transaction> {
        self.iter().filter(move |t| *t.storage == *storage)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<Transaction> for TransactionLog {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for transaction in iter {
            self.append(transaction);
        }
    }
}

impl FromIterator<Transaction> for TransactionLog {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut log = Self::new();
        log.extend(iter);
        log
    }
}

impl<'a> IntoIterator for &'a TransactionLog {
    type Item = &'a Transaction;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the transactions of a [`TransactionLog`], in log order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: core::slice::Iter<'a, RecordedTransaction>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|record| &record.transaction)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
